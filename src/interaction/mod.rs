//! Pointer, wheel and touch input normalization.

pub mod dispatcher;
pub mod events;

pub use dispatcher::{DispatcherSettings, Gestures, InteractionDispatcher, ListenerSet};
pub use events::{
    GestureEvent, InputEvent, PanConditions, PointerButton, PointerSource, Touches, ZoomDirection,
};
