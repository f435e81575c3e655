//! Viewport controller and the host-facing configuration and input types.

mod axis_zoom;
mod change_classifier;
mod chart_input;
mod frame_scheduler;
mod gesture_coordinator;
pub mod gesture_reducers;
mod json_contract;
mod redraw;
mod subscription_registry;
mod view_state;
mod viewport_accessors;
mod viewport_config;
mod viewport_controller;
mod viewport_snapshot;
mod zoom_anchor;

pub use change_classifier::{ChangeKind, ResetReason, UpdateKind, classify_change};
pub use chart_input::ChartInput;
pub use frame_scheduler::{FrameScheduler, PendingFrame, RedrawRequest};
pub use json_contract::{VIEWPORT_SNAPSHOT_JSON_SCHEMA_V1, ViewportSnapshotJsonContractV1};
pub use subscription_registry::SubscriptionRegistry;
pub use view_state::{ViewState, build_x_scale};
pub use viewport_config::{ValidationMode, ViewportConfig, ZoomAnchor};
pub use viewport_controller::{LoadMoreFn, ViewportController};
pub use viewport_snapshot::{SubChartSnapshot, ViewportSnapshot};
