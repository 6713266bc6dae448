use poi_labels::{Config, MapSession, Theme, ViewportCommand, parse_points, render_svg};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    theme: Option<String>,
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
    width: Option<f32>,
    height: Option<f32>,
    side_panel: Option<bool>,
    average_char_width: Option<f64>,
    font_size: Option<f64>,
    selected: Option<String>,
    #[serde(default)]
    events: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelVisibility {
    id: String,
    visible: bool,
}

fn parse_options(options_json: Option<String>) -> Result<MapOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(MapOptions::default()),
    }
}

fn build_config(options: &MapOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::from_name) {
        config.theme = theme;
    }
    if let Some([lat, lng]) = options.center {
        config.viewport.center = (lat, lng);
    }
    if let Some(zoom) = options.zoom {
        config.viewport.zoom = zoom;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(side_panel) = options.side_panel {
        config.render.side_panel = side_panel;
    }
    if let Some(value) = options.average_char_width {
        config.label.average_char_width = value;
    }
    if let Some(value) = options.font_size {
        config.label.font_size = value;
    }
    config
}

fn build_session(points_json: &str, options: &MapOptions, config: &Config) -> Result<MapSession, JsValue> {
    let points = parse_points(points_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let mut session = MapSession::from_config(points, config);
    for raw in &options.events {
        let command: ViewportCommand = raw
            .parse()
            .map_err(|error: poi_labels::session::CommandError| JsValue::from_str(&error.to_string()))?;
        session.apply(command);
    }
    if options.selected.is_some() {
        session.select(options.selected.as_deref());
    }
    Ok(session)
}

fn visibility_json(session: &MapSession) -> Result<String, serde_json::Error> {
    let labels: Vec<LabelVisibility> = session
        .visibility()
        .iter()
        .map(|(id, visible)| LabelVisibility {
            id: id.to_string(),
            visible,
        })
        .collect();
    serde_json::to_string(&labels)
}

/// Visibility per point as `[{ "id": ..., "visible": ... }]`, in input order.
#[wasm_bindgen]
pub fn resolve_label_visibility(points_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let session = build_session(points_json, &options, &config)?;
    visibility_json(&session).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_map_svg(points_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let session = build_session(points_json, &options, &config)?;
    Ok(render_svg(&session, &config.theme, &config.render))
}
