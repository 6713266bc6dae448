// Label overlap suppression. A label stays visible only when its box
// collides with no other box; both members of a colliding pair are hidden.

use crate::config::LabelConfig;
use crate::ir::Point;
use crate::projection::Projection;

use super::bounds::estimate_all;
use super::{ScreenBox, VisibilitySet};

/// Inclusive separating-axis test: boxes that only touch count as
/// overlapping. Comparisons involving NaN never separate, so a non-finite
/// box overlaps everything.
pub fn overlaps(a: &ScreenBox, b: &ScreenBox) -> bool {
    let separated =
        a.x > b.right() || a.right() < b.x || a.y > b.bottom() || a.bottom() < b.y;
    !separated
}

/// Visibility flags for precomputed boxes, in input order.
pub fn visibility_flags(boxes: &[ScreenBox]) -> Vec<bool> {
    let mut visible = vec![true; boxes.len()];
    // `overlaps` is symmetric, so each unordered pair is tested once.
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            if overlaps(&boxes[i], &boxes[j]) {
                visible[i] = false;
                visible[j] = false;
            }
        }
    }
    visible
}

/// Resolve precomputed boxes for `points`. Points without a box (or boxes
/// without a point) are dropped from the result.
pub fn resolve_boxes(points: &[Point], boxes: &[ScreenBox]) -> VisibilitySet {
    let ids = points.iter().map(|point| point.id.clone()).collect();
    VisibilitySet::from_parts(ids, visibility_flags(boxes))
}

/// Estimate every label box under `projection` and resolve which labels
/// may be shown.
pub fn resolve_visibility<P>(
    points: &[Point],
    projection: &P,
    config: &LabelConfig,
) -> VisibilitySet
where
    P: Projection + ?Sized,
{
    let boxes = estimate_all(points, projection, config);
    resolve_boxes(points, &boxes)
}
