use serde::{Deserialize, Serialize};

/// Raster drawing layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayer {
    Background,
    Axes,
    Mouse,
}

impl CanvasLayer {
    pub const ALL: [CanvasLayer; 3] = [Self::Background, Self::Axes, Self::Mouse];
}

/// How much of the raster stack a committed change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClearScope {
    /// Hover feedback only.
    Hover,
    /// Cursor movement that also repaints axis labels.
    Cursor,
    /// Domain or scale change.
    Full,
}

impl ClearScope {
    #[must_use]
    pub fn layers(self) -> &'static [CanvasLayer] {
        match self {
            Self::Hover => &[CanvasLayer::Mouse],
            Self::Cursor => &[CanvasLayer::Axes, CanvasLayer::Mouse],
            Self::Full => &CanvasLayer::ALL,
        }
    }

    /// Widest of two scopes, used when merging redraws within one frame.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasLayer, ClearScope};

    #[test]
    fn scopes_clear_nested_layer_sets() {
        assert_eq!(ClearScope::Hover.layers(), &[CanvasLayer::Mouse]);
        assert_eq!(
            ClearScope::Cursor.layers(),
            &[CanvasLayer::Axes, CanvasLayer::Mouse]
        );
        assert_eq!(ClearScope::Full.layers(), &CanvasLayer::ALL);
    }

    #[test]
    fn merge_keeps_widest_scope() {
        assert_eq!(ClearScope::Hover.merge(ClearScope::Full), ClearScope::Full);
        assert_eq!(ClearScope::Cursor.merge(ClearScope::Hover), ClearScope::Cursor);
    }
}
