//! Renderer-facing extension points.

pub mod subscriber;

pub use subscriber::{
    DrawRequest, EventKind, MoreProps, Subscriber, SubscriptionId, should_draw,
};
