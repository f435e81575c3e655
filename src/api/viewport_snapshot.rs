use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Point, ScaleKind, YDomain};
use crate::render::Surface;

use super::ViewportController;

/// Vertical state of one sub-chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubChartSnapshot {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub y_domain: YDomain,
    pub real_y_domain: Option<YDomain>,
    pub y_pan_enabled: bool,
}

/// Serializable view state used by regression tests and debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub series_key: String,
    pub x_scale_kind: ScaleKind,
    pub x_domain: (f64, f64),
    pub x_range: (f64, f64),
    /// Half-open index range into the full dataset.
    pub visible_range: (usize, usize),
    pub full_len: usize,
    /// Keyed by sub-chart id, in declaration order.
    pub sub_charts: IndexMap<u32, SubChartSnapshot>,
    pub pan_in_progress: bool,
    pub mouse_xy: Option<Point>,
    pub current_item: Option<usize>,
    pub current_charts: Vec<u32>,
}

impl<T: Sync, S: Surface> ViewportController<T, S> {
    /// Snapshot of what is currently on screen.
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        let view = self.displayed();
        let sub_charts = view
            .chart_configs
            .iter()
            .map(|config| {
                (
                    config.id.raw(),
                    SubChartSnapshot {
                        origin: config.origin,
                        width: config.width,
                        height: config.height,
                        y_domain: config.y_domain(),
                        real_y_domain: config.real_y_domain.clone(),
                        y_pan_enabled: config.y_pan_enabled,
                    },
                )
            })
            .collect();
        ViewportSnapshot {
            series_key: self.input.series_key.clone(),
            x_scale_kind: view.x_scale.kind(),
            x_domain: view.window.domain,
            x_range: view.x_scale.range(),
            visible_range: (view.window.range.start, view.window.range.end),
            full_len: self.input.data.len(),
            sub_charts,
            pan_in_progress: self.pan_in_progress(),
            mouse_xy: self.pointer.mouse_xy,
            current_item: self.pointer.current_item,
            current_charts: self
                .pointer
                .current_charts
                .iter()
                .map(|id| id.raw())
                .collect(),
        }
    }
}
