use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub grid_color: String,
    pub marker_fill: String,
    pub marker_stroke: String,
    pub selected_marker_fill: String,
    pub label_text_color: String,
    pub label_background: String,
    pub label_border: String,
    pub panel_background: String,
    pub panel_border: String,
    pub panel_title_color: String,
    pub panel_text_color: String,
}

impl Theme {
    /// Light palette close to the stock OpenStreetMap tile style.
    pub fn osm() -> Self {
        Self {
            font_family: "\"Helvetica Neue\", Arial, Helvetica, sans-serif".to_string(),
            background: "#F2EFE9".to_string(),
            grid_color: "#DDD8CE".to_string(),
            marker_fill: "#2A81CB".to_string(),
            marker_stroke: "#3274A3".to_string(),
            selected_marker_fill: "#CB2B3E".to_string(),
            label_text_color: "#1F1F1F".to_string(),
            label_background: "rgba(255,255,255,0.85)".to_string(),
            label_border: "#9C9C9C".to_string(),
            panel_background: "#FFFFFF".to_string(),
            panel_border: "#CCCCCC".to_string(),
            panel_title_color: "#111111".to_string(),
            panel_text_color: "#333333".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#F7FAFF".to_string(),
            grid_color: "#E3E9F4".to_string(),
            marker_fill: "#4F6BED".to_string(),
            marker_stroke: "#3A4FB8".to_string(),
            selected_marker_fill: "#E8553E".to_string(),
            label_text_color: "#1C2430".to_string(),
            label_background: "#FFFFFF".to_string(),
            label_border: "#C7D2E5".to_string(),
            panel_background: "#FFFFFF".to_string(),
            panel_border: "#D7E0F0".to_string(),
            panel_title_color: "#1C2430".to_string(),
            panel_text_color: "#4A5568".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "osm" | "default" => Some(Self::osm()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::osm()
    }
}
