use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label size estimate parameters. One value is shared by every point in a
/// resolution pass; mixing them makes overlap comparisons meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub average_char_width: f64,
    pub font_size: f64,
    pub padding: f64,
    /// Vertical gap between the marker anchor and the label bottom, roughly
    /// the marker icon height.
    pub marker_icon_offset: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            average_char_width: 8.0,
            font_size: 11.0,
            padding: 4.0,
            marker_icon_offset: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// `(lat, lng)` of the initial view center.
    pub center: (f64, f64),
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub tile_size: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            center: (11.1011, 76.9909),
            zoom: 13.0,
            min_zoom: 0.0,
            max_zoom: 19.0,
            tile_size: 256.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub side_panel: bool,
    pub side_panel_width: f32,
    pub marker_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            side_panel: true,
            side_panel_width: 250.0,
            marker_radius: 6.0,
        }
    }
}

impl RenderConfig {
    /// Width and height of the map area, which excludes the side panel.
    pub fn map_size(&self) -> (f64, f64) {
        let panel = if self.side_panel {
            self.side_panel_width.max(0.0)
        } else {
            0.0
        };
        (
            f64::from((self.width - panel).max(1.0)),
            f64::from(self.height.max(1.0)),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub label: LabelConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    grid_color: Option<String>,
    marker_color: Option<String>,
    marker_border_color: Option<String>,
    selected_marker_color: Option<String>,
    label_text_color: Option<String>,
    label_background: Option<String>,
    label_border_color: Option<String>,
    panel_background: Option<String>,
    panel_border_color: Option<String>,
    panel_title_color: Option<String>,
    panel_text_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    average_char_width: Option<f64>,
    font_size: Option<f64>,
    padding: Option<f64>,
    marker_icon_offset: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
    tile_size: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    side_panel: Option<bool>,
    side_panel_width: Option<f32>,
    marker_radius: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    label: Option<LabelConfigFile>,
    viewport: Option<ViewportConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse a JSON5 config document and merge it onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => log::warn!("unknown theme '{theme_name}', keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
        if let Some(v) = vars.grid_color {
            theme.grid_color = v;
        }
        if let Some(v) = vars.marker_color {
            theme.marker_fill = v;
        }
        if let Some(v) = vars.marker_border_color {
            theme.marker_stroke = v;
        }
        if let Some(v) = vars.selected_marker_color {
            theme.selected_marker_fill = v;
        }
        if let Some(v) = vars.label_text_color {
            theme.label_text_color = v;
        }
        if let Some(v) = vars.label_background {
            theme.label_background = v;
        }
        if let Some(v) = vars.label_border_color {
            theme.label_border = v;
        }
        if let Some(v) = vars.panel_background {
            theme.panel_background = v;
        }
        if let Some(v) = vars.panel_border_color {
            theme.panel_border = v;
        }
        if let Some(v) = vars.panel_title_color {
            theme.panel_title_color = v;
        }
        if let Some(v) = vars.panel_text_color {
            theme.panel_text_color = v;
        }
    }

    if let Some(label) = parsed.label {
        let target = &mut config.label;
        if let Some(v) = label.average_char_width {
            target.average_char_width = v;
        }
        if let Some(v) = label.font_size {
            target.font_size = v;
        }
        if let Some(v) = label.padding {
            target.padding = v;
        }
        if let Some(v) = label.marker_icon_offset {
            target.marker_icon_offset = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        let target = &mut config.viewport;
        if let Some([lat, lng]) = viewport.center {
            target.center = (lat, lng);
        }
        if let Some(v) = viewport.zoom {
            target.zoom = v;
        }
        if let Some(v) = viewport.min_zoom {
            target.min_zoom = v;
        }
        if let Some(v) = viewport.max_zoom {
            target.max_zoom = v;
        }
        if let Some(v) = viewport.tile_size {
            target.tile_size = v;
        }
        let values = [
            ("viewport.center", target.center.0),
            ("viewport.center", target.center.1),
            ("viewport.zoom", target.zoom),
            ("viewport.minZoom", target.min_zoom),
            ("viewport.maxZoom", target.max_zoom),
            ("viewport.tileSize", target.tile_size),
        ];
        if let Some((name, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
            anyhow::bail!("{name} must be a finite number, got {value}");
        }
    }

    if let Some(render) = parsed.render {
        let target = &mut config.render;
        if let Some(v) = render.width {
            target.width = v;
        }
        if let Some(v) = render.height {
            target.height = v;
        }
        if let Some(v) = render.side_panel {
            target.side_panel = v;
        }
        if let Some(v) = render.side_panel_width {
            target.side_panel_width = v;
        }
        if let Some(v) = render.marker_radius {
            target.marker_radius = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.label, LabelConfig::default());
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = parse_config(
            r##"{
                // comments are allowed
                theme: "modern",
                themeVariables: { markerColor: "#000000" },
                label: { averageCharWidth: 7.5, markerIconOffset: 32 },
                viewport: { center: [12.5, 77.0], zoom: 15 },
                render: { sidePanel: false },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.theme.marker_fill, "#000000");
        assert_eq!(config.label.average_char_width, 7.5);
        assert_eq!(config.label.marker_icon_offset, 32.0);
        assert_eq!(config.label.font_size, 11.0);
        assert_eq!(config.viewport.center, (12.5, 77.0));
        assert_eq!(config.viewport.zoom, 15.0);
        assert!(!config.render.side_panel);
    }

    #[test]
    fn map_size_excludes_side_panel() {
        let mut render = RenderConfig::default();
        assert_eq!(render.map_size(), (950.0, 800.0));
        render.side_panel = false;
        assert_eq!(render.map_size(), (1200.0, 800.0));
    }

    #[test]
    fn rejects_non_finite_viewport_values() {
        let err = parse_config("{ viewport: { minZoom: NaN, maxZoom: NaN } }").unwrap_err();
        assert!(err.to_string().contains("viewport.minZoom"), "{err}");
        assert!(parse_config("{ viewport: { zoom: Infinity } }").is_err());
        assert!(parse_config("{ viewport: { center: [NaN, 77.0] } }").is_err());
        assert!(parse_config("{ viewport: { tileSize: -Infinity } }").is_err());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_config("{ label: ").is_err());
    }
}
