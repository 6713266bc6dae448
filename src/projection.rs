use crate::config::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Maps a geo-coordinate to a pixel coordinate in the current viewport.
///
/// Only valid for the viewport state it was taken from; callers re-project
/// after every pan or zoom.
pub trait Projection {
    fn project(&self, lat: f64, lng: f64) -> (f64, f64);
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> (f64, f64),
{
    fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        self(lat, lng)
    }
}

/// Headless Web Mercator map view with square tiles, in container pixel
/// space (top-left of the view is `(0, 0)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center_lat: f64,
    center_lng: f64,
    zoom: f64,
    width: f64,
    height: f64,
    tile_size: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    pub fn new(center: (f64, f64), zoom: f64, size: (f64, f64)) -> Self {
        Self::from_config(
            &ViewportConfig {
                center,
                zoom,
                ..ViewportConfig::default()
            },
            size,
        )
    }

    /// Non-finite config values fall back to the defaults.
    pub fn from_config(config: &ViewportConfig, size: (f64, f64)) -> Self {
        let defaults = ViewportConfig::default();
        let min = finite_or(config.min_zoom, defaults.min_zoom);
        let max = finite_or(config.max_zoom, defaults.max_zoom);
        let (min_zoom, max_zoom) = if min <= max { (min, max) } else { (max, min) };
        Self {
            center_lat: finite_or(config.center.0, defaults.center.0)
                .clamp(-MAX_LATITUDE, MAX_LATITUDE),
            center_lng: finite_or(config.center.1, defaults.center.1),
            zoom: finite_or(config.zoom, defaults.zoom).clamp(min_zoom, max_zoom),
            width: size.0.max(1.0),
            height: size.1.max(1.0),
            tile_size: finite_or(config.tile_size, defaults.tile_size).max(1.0),
            min_zoom,
            max_zoom,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_lat, self.center_lng)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn world_size(&self) -> f64 {
        self.tile_size * 2f64.powf(self.zoom)
    }

    /// Ignored when either coordinate is not finite.
    pub fn set_center(&mut self, lat: f64, lng: f64) {
        if !lat.is_finite() || !lng.is_finite() {
            return;
        }
        self.center_lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.center_lng = lng;
    }

    /// Returns the zoom actually applied after clamping. A non-finite zoom
    /// leaves the current one in place.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.zoom
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Move the view by a pixel offset. Positive `dx` reveals what lies to
    /// the right, so projected points move left.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.project_world(self.center_lat, self.center_lng);
        let (lat, lng) = self.unproject_world(cx + dx, cy + dy);
        self.set_center(lat, lng);
    }

    /// Container-space position of the first tile corner at or left/above
    /// the view origin. Both components lie in `(-tile_size, 0]`.
    pub fn tile_offset(&self) -> (f64, f64) {
        let (cx, cy) = self.project_world(self.center_lat, self.center_lng);
        let left = cx - self.width / 2.0;
        let top = cy - self.height / 2.0;
        (-left.rem_euclid(self.tile_size), -top.rem_euclid(self.tile_size))
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Inverse of [`Projection::project`] for this viewport.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.project_world(self.center_lat, self.center_lng);
        self.unproject_world(x + cx - self.width / 2.0, y + cy - self.height / 2.0)
    }

    fn project_world(&self, lat: f64, lng: f64) -> (f64, f64) {
        let world = self.world_size();
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let sin = (lat * PI / 180.0).sin();
        let x = (lng + 180.0) / 360.0 * world;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * world;
        (x, y)
    }

    fn unproject_world(&self, x: f64, y: f64) -> (f64, f64) {
        let world = self.world_size();
        let lng = x / world * 360.0 - 180.0;
        let n = PI - 2.0 * PI * y / world;
        let lat = n.sinh().atan() * 180.0 / PI;
        (lat, lng)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

impl Projection for Viewport {
    fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let (cx, cy) = self.project_world(self.center_lat, self.center_lng);
        let (x, y) = self.project_world(lat, lng);
        (x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn coimbatore(zoom: f64) -> Viewport {
        Viewport::new((11.1011, 76.9909), zoom, (950.0, 800.0))
    }

    #[test]
    fn center_projects_to_middle_of_view() {
        let view = coimbatore(13.0);
        let (x, y) = view.project(11.1011, 76.9909);
        assert_abs_diff_eq!(x, 475.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 400.0, epsilon = 1e-6);
    }

    #[test]
    fn zooming_in_one_level_doubles_pixel_distance() {
        let a = (11.1011, 76.9909);
        let b = (11.0976515, 76.9918195);
        let distance = |view: &Viewport| {
            let (ax, ay) = view.project(a.0, a.1);
            let (bx, by) = view.project(b.0, b.1);
            ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
        };
        let d12 = distance(&coimbatore(12.0));
        let d13 = distance(&coimbatore(13.0));
        assert_abs_diff_eq!(d13, d12 * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let view = coimbatore(13.0);
        let (_, y_north) = view.project(11.2, 76.9909);
        let (x_east, _) = view.project(11.1011, 77.1);
        assert!(y_north < 400.0);
        assert!(x_east > 475.0);
    }

    #[test]
    fn pan_by_shifts_projected_points_the_other_way() {
        let mut view = coimbatore(13.0);
        let before = view.project(11.0976515, 76.9918195);
        view.pan_by(120.0, -30.0);
        let after = view.project(11.0976515, 76.9918195);
        assert_abs_diff_eq!(after.0, before.0 - 120.0, epsilon = 1e-6);
        assert_abs_diff_eq!(after.1, before.1 + 30.0, epsilon = 1e-6);
    }

    #[test]
    fn unproject_inverts_project() {
        let view = coimbatore(15.0);
        let (x, y) = view.project(11.438517, 77.559867);
        let (lat, lng) = view.unproject(x, y);
        assert_abs_diff_eq!(lat, 11.438517, epsilon = 1e-9);
        assert_abs_diff_eq!(lng, 77.559867, epsilon = 1e-9);
    }

    #[test]
    fn zoom_is_clamped_to_configured_range() {
        let mut view = coimbatore(13.0);
        assert_abs_diff_eq!(view.set_zoom(42.0), ViewportConfig::default().max_zoom);
        assert_abs_diff_eq!(view.set_zoom(-3.0), ViewportConfig::default().min_zoom);
    }

    #[test]
    fn non_finite_config_falls_back_to_defaults() {
        let config = ViewportConfig {
            center: (f64::NAN, f64::INFINITY),
            zoom: f64::NAN,
            min_zoom: f64::NAN,
            max_zoom: f64::NAN,
            tile_size: f64::NEG_INFINITY,
        };
        let mut view = Viewport::from_config(&config, (950.0, 800.0));
        let defaults = ViewportConfig::default();
        assert_eq!(view.center(), defaults.center);
        assert_eq!(view.zoom(), defaults.zoom);
        assert_eq!(view.tile_size(), defaults.tile_size);
        assert_eq!(view.set_zoom(42.0), defaults.max_zoom);
        assert_eq!(view.set_zoom(f64::NAN), defaults.max_zoom);
        view.set_center(f64::NAN, 0.0);
        assert_eq!(view.center(), defaults.center);
    }

    #[test]
    fn swapped_zoom_bounds_are_reordered() {
        let config = ViewportConfig {
            zoom: 30.0,
            min_zoom: 18.0,
            max_zoom: 2.0,
            ..ViewportConfig::default()
        };
        let view = Viewport::from_config(&config, (950.0, 800.0));
        assert_eq!(view.zoom(), 18.0);
    }

    #[test]
    fn resize_clamps_to_one_pixel() {
        let mut view = coimbatore(13.0);
        view.resize(0.0, -20.0);
        assert_eq!(view.size(), (1.0, 1.0));
        view.resize(f64::NAN, 640.0);
        assert_eq!(view.size(), (1.0, 640.0));
        let (x, y) = view.project(11.1011, 76.9909);
        assert_abs_diff_eq!(x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 320.0, epsilon = 1e-6);
    }

    #[test]
    fn closures_are_projections() {
        let identity = |lat: f64, lng: f64| (lng, lat);
        assert_eq!(identity.project(2.0, 3.0), (3.0, 2.0));
    }
}
