use crate::config::LabelConfig;
use crate::ir::Point;
use crate::projection::Projection;

use super::ScreenBox;

/// Estimated label size in pixels from the character count. This is a fixed
/// per-character heuristic, not glyph metrics.
pub fn label_size(text: &str, config: &LabelConfig) -> (f64, f64) {
    let chars = text.chars().count() as f64;
    let width = chars * config.average_char_width + config.padding * 2.0;
    let height = config.font_size + config.padding * 2.0;
    (width, height)
}

/// Box of a point's label, horizontally centered above its marker.
pub fn estimate_bounds<P>(point: &Point, projection: &P, config: &LabelConfig) -> ScreenBox
where
    P: Projection + ?Sized,
{
    let (width, height) = label_size(point.display_text(), config);
    let (px, py) = projection.project(point.lat, point.lng);
    ScreenBox {
        x: px - width / 2.0,
        y: py - height - config.marker_icon_offset,
        width,
        height,
    }
}

/// Boxes for every point, in input order.
pub fn estimate_all<P>(points: &[Point], projection: &P, config: &LabelConfig) -> Vec<ScreenBox>
where
    P: Projection + ?Sized,
{
    points
        .iter()
        .map(|point| estimate_bounds(point, projection, config))
        .collect()
}
