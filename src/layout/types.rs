use serde::Serialize;

/// Estimated pixel rectangle of a rendered label, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScreenBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Per-point label visibility for one resolution pass, in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VisibilitySet {
    ids: Vec<String>,
    visible: Vec<bool>,
}

impl VisibilitySet {
    /// Pairs ids with flags; any surplus on either side is dropped.
    pub(crate) fn from_parts(mut ids: Vec<String>, mut visible: Vec<bool>) -> Self {
        let len = ids.len().min(visible.len());
        ids.truncate(len);
        visible.truncate(len);
        Self { ids, visible }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Visibility by input index; `false` when out of range.
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Visibility by point id; `None` for ids not in this pass.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.ids
            .iter()
            .position(|candidate| candidate == id)
            .and_then(|index| self.visible.get(index).copied())
    }

    pub fn flags(&self) -> &[bool] {
        &self.visible
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.visible.iter().copied())
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|flag| **flag).count()
    }

    pub fn hidden_count(&self) -> usize {
        self.len() - self.visible_count()
    }
}
