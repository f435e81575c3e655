//! chart-viewport: viewport, scale and gesture coordination for stacked
//! financial charts.
//!
//! The crate keeps the "full data to visible window" mapping of a chart
//! consistent under pan, zoom, pinch and resize, refreshes the vertical
//! scales of every sub-chart from the visible window, and turns raw pointer
//! input into ordered, frame-coalesced domain changes. Drawing is left to
//! subscribers registered with [`ViewportController`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartInput, ViewportConfig, ViewportController};
pub use error::{ChartError, ChartResult};
