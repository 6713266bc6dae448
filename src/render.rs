use crate::config::{LabelConfig, RenderConfig};
use crate::ir::Point;
use crate::layout::ScreenBox;
use crate::projection::Projection;
use crate::session::MapSession;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const PANEL_PADDING: f32 = 20.0;
const PANEL_TITLE_SIZE: f32 = 20.0;
const PANEL_TEXT_SIZE: f32 = 14.0;
const PANEL_LINE_GAP: f32 = 8.0;

/// Render the current session state: tile grid, a pin for every point, the
/// labels the last pass left visible, and the side panel.
pub fn render_svg(session: &MapSession, theme: &Theme, config: &RenderConfig) -> String {
    let width = config.width.max(1.0);
    let height = config.height.max(1.0);
    let (map_w, map_h) = session.viewport().size();
    let (map_w, map_h) = (map_w as f32, map_h as f32);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<defs><clipPath id=\"map-area\"><rect x=\"0\" y=\"0\" width=\"{map_w:.2}\" height=\"{map_h:.2}\"/></clipPath></defs>"
    ));
    svg.push_str(&format!(
        "<rect width=\"{map_w:.2}\" height=\"{map_h:.2}\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<g clip-path=\"url(#map-area)\">");
    svg.push_str(&tile_grid_svg(session, theme, map_w, map_h));

    let selected = session.selected_index();
    for (idx, point) in session.points().iter().enumerate() {
        let (x, y) = session.viewport().project(point.lat, point.lng);
        let fill = if selected == Some(idx) {
            theme.selected_marker_fill.as_str()
        } else {
            theme.marker_fill.as_str()
        };
        svg.push_str(&marker_svg(x as f32, y as f32, config.marker_radius, fill, theme));
    }

    let visibility = session.visibility();
    for (idx, (point, bounds)) in session.points().iter().zip(session.boxes()).enumerate() {
        if visibility.is_visible(idx) {
            svg.push_str(&label_svg(point, bounds, session.label_config(), theme));
        }
    }
    svg.push_str("</g>");

    if config.side_panel {
        svg.push_str(&side_panel_svg(
            session.selected_point(),
            map_w,
            config.side_panel_width.max(0.0),
            height,
            theme,
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn tile_grid_svg(session: &MapSession, theme: &Theme, map_w: f32, map_h: f32) -> String {
    let (ox, oy) = session.viewport().tile_offset();
    let tile = session.viewport().tile_size() as f32;
    let mut grid = String::new();
    let mut x = ox as f32;
    while x <= map_w {
        grid.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"0\" x2=\"{x:.2}\" y2=\"{map_h:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            theme.grid_color
        ));
        x += tile;
    }
    let mut y = oy as f32;
    while y <= map_h {
        grid.push_str(&format!(
            "<line x1=\"0\" y1=\"{y:.2}\" x2=\"{map_w:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            theme.grid_color
        ));
        y += tile;
    }
    grid
}

/// Teardrop pin whose tip sits on the projected coordinate.
fn marker_svg(x: f32, y: f32, radius: f32, fill: &str, theme: &Theme) -> String {
    let r = radius.max(1.0);
    let cy = y - r * 2.2;
    format!(
        "<path d=\"M {x:.2} {y:.2} L {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} Z\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"/><circle cx=\"{x:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"#FFFFFF\"/>",
        x - r * 0.85,
        cy + r * 0.5,
        x + r * 0.85,
        cy + r * 0.5,
        theme.marker_stroke,
        r * 0.4
    )
}

fn label_svg(point: &Point, bounds: &ScreenBox, label: &LabelConfig, theme: &Theme) -> String {
    let (center_x, _) = bounds.center();
    let baseline = bounds.y + label.padding + label.font_size * 0.85;
    format!(
        "<g class=\"poi-label\" data-id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"3\" ry=\"3\" fill=\"{}\" stroke=\"{}\" stroke-width=\"0.8\"/><text x=\"{center_x:.2}\" y=\"{baseline:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text></g>",
        escape_xml(&point.id),
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
        theme.label_background,
        theme.label_border,
        escape_xml(&theme.font_family),
        label.font_size,
        theme.label_text_color,
        escape_xml(point.display_text())
    )
}

fn side_panel_svg(
    selected: Option<&Point>,
    x: f32,
    width: f32,
    height: f32,
    theme: &Theme,
) -> String {
    let mut panel = String::new();
    panel.push_str(&format!(
        "<g class=\"side-panel\"><rect x=\"{x:.2}\" y=\"0\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.panel_background, theme.panel_border
    ));
    let text_x = x + PANEL_PADDING;
    let family = escape_xml(&theme.font_family);

    let Some(point) = selected else {
        panel.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{:.2}\" font-family=\"{family}\" font-size=\"{PANEL_TEXT_SIZE}\" fill=\"{}\">Select a location</text></g>",
            PANEL_PADDING + PANEL_TEXT_SIZE,
            theme.panel_text_color
        ));
        return panel;
    };

    let mut y = PANEL_PADDING + PANEL_TITLE_SIZE;
    panel.push_str(&format!(
        "<text x=\"{text_x:.2}\" y=\"{y:.2}\" font-family=\"{family}\" font-size=\"{PANEL_TITLE_SIZE}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        theme.panel_title_color,
        escape_xml(&point.name)
    ));
    y += PANEL_LINE_GAP * 2.0;
    for line in point.info_lines() {
        y += PANEL_TEXT_SIZE + PANEL_LINE_GAP;
        panel.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{y:.2}\" font-family=\"{family}\" font-size=\"{PANEL_TEXT_SIZE}\" fill=\"{}\">{}</text>",
            theme.panel_text_color,
            escape_xml(line)
        ));
    }
    panel.push_str("</g>");
    panel
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(1200.0, 800.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session(zoom: f64) -> MapSession {
        let mut config = Config::default();
        config.viewport.zoom = zoom;
        let points = vec![
            Point::new("sixers", "Sydney Sixers(16L)", 11.1011, 76.9909)
                .with_info("Nivara Avenue Group \n3.5 to 4 cents \nNorth facing"),
            Point::new("nivara", "Nivara Avenue", 11.0976515, 76.9918195),
            Point::new("temple", "Pon <Parappi> & Co", 11.10, 76.96),
        ];
        MapSession::from_config(points, &config)
    }

    #[test]
    fn hidden_labels_are_not_rendered() {
        let session = session(12.0);
        let svg = render_svg(&session, &Theme::osm(), &RenderConfig::default());
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains(">Sydney Sixers(16L)</text>"));
        assert!(!svg.contains(">Nivara Avenue</text>"));
        // every marker is still drawn
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn visible_labels_are_rendered_and_escaped() {
        let session = session(14.0);
        let svg = render_svg(&session, &Theme::osm(), &RenderConfig::default());
        assert!(svg.contains(">Sydney Sixers(16L)</text>"));
        assert!(svg.contains(">Nivara Avenue</text>"));
        assert!(svg.contains("Pon &lt;Parappi&gt; &amp; Co"));
        assert_eq!(svg.matches("class=\"poi-label\"").count(), 3);
    }

    #[test]
    fn side_panel_shows_placeholder_then_selection() {
        let mut session = session(14.0);
        let svg = render_svg(&session, &Theme::osm(), &RenderConfig::default());
        assert!(svg.contains("Select a location"));

        session.select(Some("sixers"));
        let svg = render_svg(&session, &Theme::osm(), &RenderConfig::default());
        assert!(!svg.contains("Select a location"));
        assert!(svg.contains(">North facing</text>"));
        assert!(svg.contains(&Theme::osm().selected_marker_fill));
    }

    #[test]
    fn side_panel_can_be_disabled() {
        let session = session(14.0);
        let config = RenderConfig {
            side_panel: false,
            ..RenderConfig::default()
        };
        let svg = render_svg(&session, &Theme::modern(), &config);
        assert!(!svg.contains("side-panel"));
    }
}
