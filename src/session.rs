use crate::config::{Config, LabelConfig};
use crate::ir::Point;
use crate::layout::{ScreenBox, VisibilitySet, estimate_all, resolve_boxes};
use crate::projection::Viewport;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const UNSIGNED: &str = r"(?:\d+(?:\.\d*)?|\.\d+)";

static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(pan|drag|center)\s*:\s*([-+]?{UNSIGNED})\s*,\s*([-+]?{UNSIGNED})$"
    ))
    .unwrap()
});
static ZOOM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^zoom\s*:\s*([-+]?)\s*({UNSIGNED})$")).unwrap());

/// Notifications that trigger a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    /// First layout is available.
    Mounted,
    PanEnded,
    ZoomEnded,
    PointsChanged,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unrecognised viewport command '{0}' (expected pan:DX,DY, drag:DX,DY, center:LAT,LNG or zoom:Z)")]
    Unrecognised(String),
    #[error("invalid number '{0}' in viewport command")]
    Number(String),
}

/// A user gesture applied to the session, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCommand {
    /// Settled pan by a pixel offset.
    Pan { dx: f64, dy: f64 },
    /// Intermediate drag frame; moves the view without a resolution pass.
    Drag { dx: f64, dy: f64 },
    /// Recenter on a geo-coordinate, settling as a pan.
    Center { lat: f64, lng: f64 },
    ZoomTo(f64),
    ZoomBy(f64),
}

impl FromStr for ViewportCommand {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let number = |raw: &str| -> Result<f64, CommandError> {
            raw.parse::<f64>()
                .map_err(|_| CommandError::Number(raw.to_string()))
        };
        if let Some(caps) = PAIR_RE.captures(trimmed) {
            let a = number(&caps[2])?;
            let b = number(&caps[3])?;
            return Ok(match &caps[1] {
                "pan" => Self::Pan { dx: a, dy: b },
                "drag" => Self::Drag { dx: a, dy: b },
                _ => Self::Center { lat: a, lng: b },
            });
        }
        if let Some(caps) = ZOOM_RE.captures(trimmed) {
            let value = number(&caps[2])?;
            return Ok(match &caps[1] {
                "+" => Self::ZoomBy(value),
                "-" => Self::ZoomBy(-value),
                _ => Self::ZoomTo(value),
            });
        }
        Err(CommandError::Unrecognised(trimmed.to_string()))
    }
}

/// Serial owner of the point snapshot, the viewport and the published
/// visibility. Every pass recomputes from scratch and swaps the result in
/// with a single assignment, so readers holding an earlier `Arc` always see
/// a complete vector.
#[derive(Debug, Clone)]
pub struct MapSession {
    points: Arc<[Point]>,
    viewport: Viewport,
    label: LabelConfig,
    boxes: Arc<[ScreenBox]>,
    visibility: Arc<VisibilitySet>,
    selected: Option<usize>,
    passes: u64,
}

impl MapSession {
    /// Create a session and run the initial pass.
    pub fn new(points: Vec<Point>, viewport: Viewport, label: LabelConfig) -> Self {
        let mut session = Self {
            points: points.into(),
            viewport,
            label,
            boxes: Arc::from(Vec::new()),
            visibility: Arc::new(VisibilitySet::default()),
            selected: None,
            passes: 0,
        };
        session.notify(MapEvent::Mounted);
        session
    }

    pub fn from_config(points: Vec<Point>, config: &Config) -> Self {
        let viewport = Viewport::from_config(&config.viewport, config.render.map_size());
        Self::new(points, viewport, config.label)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn label_config(&self) -> &LabelConfig {
        &self.label
    }

    /// Boxes from the latest pass, in point order.
    pub fn boxes(&self) -> &[ScreenBox] {
        &self.boxes
    }

    /// The currently published visibility.
    pub fn visibility(&self) -> Arc<VisibilitySet> {
        Arc::clone(&self.visibility)
    }

    /// Number of resolution passes run so far, including the initial one.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run a resolution pass against the current snapshot and publish it.
    pub fn notify(&mut self, event: MapEvent) -> Arc<VisibilitySet> {
        let points = Arc::clone(&self.points);
        let boxes = estimate_all(&points, &self.viewport, &self.label);
        let visibility = Arc::new(resolve_boxes(&points, &boxes));
        self.passes += 1;
        log::debug!(
            "label pass #{} on {:?} at zoom {:.2}: {} visible, {} hidden",
            self.passes,
            event,
            self.viewport.zoom(),
            visibility.visible_count(),
            visibility.hidden_count()
        );

        self.boxes = boxes.into();
        self.visibility = Arc::clone(&visibility);
        visibility
    }

    /// Move the view mid-gesture. Visibility is left untouched until the
    /// gesture settles.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Arc<VisibilitySet> {
        self.viewport.pan_by(dx, dy);
        self.notify(MapEvent::PanEnded)
    }

    pub fn set_center(&mut self, lat: f64, lng: f64) -> Arc<VisibilitySet> {
        self.viewport.set_center(lat, lng);
        self.notify(MapEvent::PanEnded)
    }

    pub fn zoom_to(&mut self, zoom: f64) -> Arc<VisibilitySet> {
        self.viewport.set_zoom(zoom);
        self.notify(MapEvent::ZoomEnded)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Arc<VisibilitySet> {
        self.viewport.resize(width, height);
        self.notify(MapEvent::PanEnded)
    }

    /// Swap in a new point set. The selection is kept when its id survives.
    pub fn replace_points(&mut self, points: Vec<Point>) -> Arc<VisibilitySet> {
        let selected_id = self.selected_point().map(|point| point.id.clone());
        self.points = points.into();
        self.selected = selected_id
            .and_then(|id| self.points.iter().position(|point| point.id == id));
        self.notify(MapEvent::PointsChanged)
    }

    pub fn apply(&mut self, command: ViewportCommand) {
        match command {
            ViewportCommand::Pan { dx, dy } => {
                self.pan_by(dx, dy);
            }
            ViewportCommand::Drag { dx, dy } => self.drag(dx, dy),
            ViewportCommand::Center { lat, lng } => {
                self.set_center(lat, lng);
            }
            ViewportCommand::ZoomTo(zoom) => {
                self.zoom_to(zoom);
            }
            ViewportCommand::ZoomBy(delta) => {
                let zoom = self.viewport.zoom() + delta;
                self.zoom_to(zoom);
            }
        }
    }

    /// Select the point shown in the side panel. Returns the selected point,
    /// or `None` (clearing the selection) when the id is unknown.
    pub fn select(&mut self, id: Option<&str>) -> Option<&Point> {
        self.selected = id.and_then(|id| self.points.iter().position(|point| point.id == id));
        if let (Some(id), None) = (id, self.selected) {
            log::warn!("no point with id '{id}' to select");
        }
        self.selected_point()
    }

    pub fn selected_point(&self) -> Option<&Point> {
        self.selected.and_then(|index| self.points.get(index))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }
}
