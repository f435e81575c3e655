use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Point;

/// Active touch points, first finger first.
pub type Touches = SmallVec<[Point; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Raw pointer/touch input, positions relative to the plot area origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    MouseEnter,
    MouseLeave,
    MouseMove { position: Point },
    MouseDown { position: Point, button: PointerButton },
    MouseUp { position: Point },
    Click { position: Point },
    ContextMenu { position: Point },
    Wheel { position: Point, dx: f64, dy: f64 },
    TouchStart { touches: Touches },
    TouchMove { touches: Touches },
    /// Carries the touches still down after the release.
    TouchEnd { touches: Touches },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Pixel stretch factor applied around the anchor.
    #[must_use]
    pub fn factor(self, multiplier: f64) -> f64 {
        match self {
            Self::In => 1.0 / multiplier,
            Self::Out => multiplier,
        }
    }
}

/// Semantic gesture vocabulary emitted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    MouseEnter,
    MouseLeave,
    MouseMove { position: Point, source: PointerSource },
    MouseDown { position: Point },
    Click { position: Point },
    DoubleClick { position: Point },
    ContextMenu { position: Point },
    Zoom { direction: ZoomDirection, position: Point },
    PanStart { origin: Point },
    /// Cumulative delta from the pan origin.
    Pan { position: Point, dx: f64, dy: f64 },
    /// `moved == false` ends a session that never produced a pan delta.
    PanEnd { position: Point, dx: f64, dy: f64, moved: bool },
    DragStart { start: Point },
    Drag { start: Point, position: Point },
    DragEnd { position: Point },
    PinchStart { touch1: Point, touch2: Point },
    PinchZoom { touch1: Point, touch2: Point },
    PinchZoomEnd,
}

impl GestureEvent {
    /// Move-class gestures are coalesced to one per animation frame.
    #[must_use]
    pub fn is_move_class(&self) -> bool {
        matches!(
            self,
            Self::MouseMove { .. } | Self::Pan { .. } | Self::Drag { .. } | Self::PinchZoom { .. }
        )
    }
}

/// What a subscriber allows while the pointer is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanConditions {
    pub draggable: bool,
    pub pan_enabled: bool,
}

impl Default for PanConditions {
    fn default() -> Self {
        Self {
            draggable: false,
            pan_enabled: true,
        }
    }
}

impl PanConditions {
    /// Folds subscriber conditions: any draggable subscriber wins, every
    /// subscriber must allow panning.
    #[must_use]
    pub fn aggregate(pan_event: bool, conditions: impl IntoIterator<Item = PanConditions>) -> Self {
        conditions.into_iter().fold(
            Self {
                draggable: false,
                pan_enabled: pan_event,
            },
            |acc, next| Self {
                draggable: acc.draggable || next.draggable,
                pan_enabled: acc.pan_enabled && next.pan_enabled,
            },
        )
    }
}
