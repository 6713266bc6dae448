use crate::projection::Projection;
use crate::session::MapSession;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct MapDump {
    pub center: [f64; 2],
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub passes: u64,
    pub visible: usize,
    pub hidden: usize,
    pub selected: Option<String>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub id: String,
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub anchor: [f64; 2],
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

impl MapDump {
    pub fn from_session(session: &MapSession) -> Self {
        let viewport = session.viewport();
        let visibility = session.visibility();
        let labels = session
            .points()
            .iter()
            .zip(session.boxes())
            .enumerate()
            .map(|(idx, (point, bounds))| {
                let (ax, ay) = viewport.project(point.lat, point.lng);
                LabelDump {
                    id: point.id.clone(),
                    text: point.display_text().to_string(),
                    lat: point.lat,
                    lng: point.lng,
                    anchor: [ax, ay],
                    x: bounds.x,
                    y: bounds.y,
                    width: bounds.width,
                    height: bounds.height,
                    visible: visibility.is_visible(idx),
                }
            })
            .collect();

        let (lat, lng) = viewport.center();
        let (width, height) = viewport.size();
        MapDump {
            center: [lat, lng],
            zoom: viewport.zoom(),
            width,
            height,
            passes: session.passes(),
            visible: visibility.visible_count(),
            hidden: visibility.hidden_count(),
            selected: session.selected_point().map(|point| point.id.clone()),
            labels,
        }
    }
}

/// Write the dump as pretty JSON to `path`, or stdout when `None`.
pub fn write_map_dump(path: Option<&Path>, session: &MapSession) -> anyhow::Result<()> {
    let dump = MapDump::from_session(session);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelConfig;
    use crate::ir::Point;
    use crate::projection::Viewport;

    #[test]
    fn dump_mirrors_session_state() {
        let viewport = Viewport::new((11.1011, 76.9909), 12.0, (950.0, 800.0));
        let points = vec![
            Point::new("sixers", "Sydney Sixers(16L)", 11.1011, 76.9909),
            Point::new("nivara", "Nivara Avenue", 11.0976515, 76.9918195),
            Point::new("temple", "Location 2", 11.438517, 77.559867),
        ];
        let mut session = MapSession::new(points, viewport, LabelConfig::default());
        session.select(Some("temple"));

        let dump = MapDump::from_session(&session);
        assert_eq!(dump.labels.len(), 3);
        assert_eq!(dump.visible, 1);
        assert_eq!(dump.hidden, 2);
        assert_eq!(dump.selected.as_deref(), Some("temple"));
        assert_eq!(dump.labels[0].anchor, [475.0, 400.0]);
        assert_eq!(dump.labels[0].width, 152.0);
        assert!(dump.labels[2].visible);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["labels"][1]["id"], "nivara");
        assert_eq!(json["labels"][1]["visible"], false);
    }
}
