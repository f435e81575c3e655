use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ChartInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    Initial,
    SeriesChanged,
    XAccessorChanged,
    XExtentsChanged,
    /// The current x scale cannot be inverted or does not map the data.
    NonInteractive,
    ConfigChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    /// Viewport size or margin changed.
    Resize,
    /// New dataset for the same series.
    DataChanged,
    /// Sub-chart declarations changed.
    Layout,
}

/// How the controller reacts to new host inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Reset(ResetReason),
    Update(UpdateKind),
    NoOp,
}

/// Classifies `next` against the inputs the current view was built from.
///
/// Reset rules take precedence; among updates a data change wins over a
/// resize, which wins over a layout change.
#[must_use]
pub fn classify_change<T>(
    previous: Option<&ChartInput<T>>,
    next: &ChartInput<T>,
    interactive: bool,
) -> ChangeKind {
    let Some(previous) = previous else {
        return ChangeKind::Reset(ResetReason::Initial);
    };
    if !interactive {
        return ChangeKind::Reset(ResetReason::NonInteractive);
    }
    if previous.series_key != next.series_key {
        return ChangeKind::Reset(ResetReason::SeriesChanged);
    }
    if !previous.x_accessor.same_as(&next.x_accessor) {
        return ChangeKind::Reset(ResetReason::XAccessorChanged);
    }
    if !previous.x_extents.same_policy(&next.x_extents) {
        return ChangeKind::Reset(ResetReason::XExtentsChanged);
    }
    if !Arc::ptr_eq(&previous.data, &next.data) {
        return ChangeKind::Update(UpdateKind::DataChanged);
    }
    if previous.viewport != next.viewport || previous.margin != next.margin {
        return ChangeKind::Update(UpdateKind::Resize);
    }
    let same_display = match (&previous.display_x_accessor, &next.display_x_accessor) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_as(b),
        _ => false,
    };
    if !Arc::ptr_eq(&previous.sub_charts, &next.sub_charts) || !same_display {
        return ChangeKind::Update(UpdateKind::Layout);
    }
    ChangeKind::NoOp
}
