use serde::{Deserialize, Serialize};

/// A geo-located record rendered as a map marker with a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub name: String,
    /// Label text shown next to the marker. Falls back to `name`.
    pub display: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Free-form detail payload, one entry per line.
    pub info: String,
}

impl Point {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display: None,
            lat,
            lng,
            info: String::new(),
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn display_text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }

    /// Detail lines for the side panel, trimmed, blank lines dropped.
    pub fn info_lines(&self) -> impl Iterator<Item = &str> {
        self.info
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_falls_back_to_name() {
        let point = Point::new("a", "Nivara Avenue", 11.09, 76.99);
        assert_eq!(point.display_text(), "Nivara Avenue");
        let point = point.with_display("Nivara");
        assert_eq!(point.display_text(), "Nivara");
    }

    #[test]
    fn info_lines_split_and_trim() {
        let point = Point::new("a", "A", 0.0, 0.0)
            .with_info("Nivara Avenue Group \n3.5 to 4 cents \n\nNorth facing");
        let lines: Vec<&str> = point.info_lines().collect();
        assert_eq!(lines, vec!["Nivara Avenue Group", "3.5 to 4 cents", "North facing"]);
    }
}
