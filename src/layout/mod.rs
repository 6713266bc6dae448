pub mod bounds;
mod types;
pub mod visibility;

pub use bounds::{estimate_all, estimate_bounds, label_size};
pub use types::{ScreenBox, VisibilitySet};
pub use visibility::{overlaps, resolve_boxes, resolve_visibility, visibility_flags};
