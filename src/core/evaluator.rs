use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::scale::{LinearScale, Scale};
use crate::core::types::XAccessor;
use crate::core::windowing::slice_for_domain;
use crate::error::ChartResult;

/// Restricts a requested domain to the x range actually covered by data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClampMode {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl ClampMode {
    #[must_use]
    pub fn clamps_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    #[must_use]
    pub fn clamps_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

/// Custom clamp: `(requested_domain, data_bounds) -> domain`.
pub type ClampFn = Arc<dyn Fn((f64, f64), (f64, f64)) -> (f64, f64) + Send + Sync>;

/// Domain chosen when the density gate truncates an over-dense slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TruncationPolicy {
    /// Fit the domain to the first and last kept items.
    #[default]
    RefitDomain,
    /// Keep the requested (clamped) domain and only drop the oldest items.
    KeepRequestedDomain,
}

/// Knobs of the density gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    pub use_whole_data: bool,
    pub clamp: ClampMode,
    pub points_per_px_threshold: f64,
    pub min_points_per_px_threshold: f64,
    pub flip_x_scale: bool,
    pub truncation: TruncationPolicy,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            use_whole_data: false,
            clamp: ClampMode::None,
            points_per_px_threshold: 2.0,
            min_points_per_px_threshold: 1.0 / 100.0,
            flip_x_scale: false,
            truncation: TruncationPolicy::RefitDomain,
        }
    }
}

/// Contiguous slice of the full dataset plus the domain that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleWindow {
    pub range: Range<usize>,
    pub domain: (f64, f64),
}

impl VisibleWindow {
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    #[must_use]
    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        data.get(self.range.clone()).unwrap_or(&[])
    }
}

/// Position of the last data item in the scale the edge was reached with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackEnd {
    pub last_item_value: f64,
    pub last_item_px: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterHints {
    /// Window shown before this request; reused when the gate rejects it.
    pub current: Option<VisibleWindow>,
    pub fallback_start: Option<f64>,
    pub fallback_end: Option<FallbackEnd>,
}

impl FilterHints {
    #[must_use]
    pub fn with_current(current: VisibleWindow) -> Self {
        Self {
            current: Some(current),
            ..Self::default()
        }
    }
}

/// Which branch of the density gate produced the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    WholeData,
    Accepted,
    ExtendedDomain,
    KeptCurrent,
    Truncated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub window: VisibleWindow,
    pub outcome: FilterOutcome,
}

/// Full data plus candidate domain in, visible window out.
#[derive(Clone, Default)]
pub struct DataFilter {
    settings: FilterSettings,
    clamp_fn: Option<ClampFn>,
}

impl fmt::Debug for DataFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFilter")
            .field("settings", &self.settings)
            .field("custom_clamp", &self.clamp_fn.is_some())
            .finish()
    }
}

impl DataFilter {
    #[must_use]
    pub fn new(settings: FilterSettings, clamp_fn: Option<ClampFn>) -> Self {
        Self { settings, clamp_fn }
    }

    #[must_use]
    pub fn settings(&self) -> FilterSettings {
        self.settings
    }

    /// Computes the visible window for `input_domain`.
    ///
    /// Non-invertible scales always show the whole dataset.
    pub fn filter<T>(
        &self,
        data: &[T],
        input_domain: (f64, f64),
        x: &XAccessor<T>,
        scale: &Scale,
        hints: &FilterHints,
    ) -> ChartResult<Filtered> {
        let Scale::Linear(initial_scale) = scale else {
            return Ok(whole_data(data, input_domain));
        };
        if self.settings.use_whole_data || data.is_empty() {
            return Ok(whole_data(data, input_domain));
        }
        let initial_scale = *initial_scale;

        let (mut left, mut right) = input_domain;
        let mut domain = input_domain;
        let mut range = slice_for_domain(data, domain, x);

        if range.len() == 1 {
            if let (Some(start), Some(fallback_end)) = (hints.fallback_start, hints.fallback_end) {
                if let Some(end) = anchored_end(fallback_end, initial_scale, start) {
                    left = start;
                    right = end;
                    domain = (left, right);
                    range = slice_for_domain(data, domain, x);
                }
            }
        }

        let data_bounds = (x.get(&data[0]), x.get(&data[data.len() - 1]));
        let clamped = match &self.clamp_fn {
            Some(clamp) => clamp(domain, data_bounds),
            None => {
                let mut clamped = domain;
                if self.settings.clamp.clamps_left() {
                    clamped.0 = left.max(data_bounds.0);
                }
                if self.settings.clamp.clamps_right() {
                    clamped.1 = right.min(data_bounds.1);
                }
                clamped
            }
        };
        if clamped != domain {
            domain = clamped;
            range = slice_for_domain(data, domain, x);
        }

        let x_scale = initial_scale.with_domain(domain)?;
        let width = slice_width(&data[range.clone()], x, x_scale, self.settings.flip_x_scale);
        let (range_start, range_end) = x_scale.range();
        let chart_width = (range_end - range_start).abs();
        let max_points = show_max_threshold(width, self.settings.points_per_px_threshold);

        trace!(
            points = range.len(),
            width_px = width,
            max_points = max_points,
            "density gate"
        );

        if can_show(
            width,
            range.len(),
            self.settings.points_per_px_threshold,
            self.settings.min_points_per_px_threshold,
        ) {
            return Ok(Filtered {
                window: VisibleWindow { range, domain },
                outcome: FilterOutcome::Accepted,
            });
        }

        if chart_width > max_points as f64 {
            if let Some(end) = hints
                .fallback_end
                .and_then(|fallback_end| anchored_end(fallback_end, initial_scale, domain.0))
            {
                return Ok(Filtered {
                    window: VisibleWindow {
                        range,
                        domain: (domain.0, end),
                    },
                    outcome: FilterOutcome::ExtendedDomain,
                });
            }
        }

        if let Some(current) = &hints.current {
            return Ok(Filtered {
                window: current.clone(),
                outcome: FilterOutcome::KeptCurrent,
            });
        }

        let keep = show_max(width, self.settings.points_per_px_threshold);
        let start = range.end.saturating_sub(keep).max(range.start);
        let kept = start..range.end;
        let kept_domain = match self.settings.truncation {
            TruncationPolicy::RefitDomain if !kept.is_empty() => {
                (x.get(&data[kept.start]), x.get(&data[kept.end - 1]))
            }
            _ => domain,
        };
        Ok(Filtered {
            window: VisibleWindow {
                range: kept,
                domain: kept_domain,
            },
            outcome: FilterOutcome::Truncated,
        })
    }
}

fn whole_data<T>(data: &[T], domain: (f64, f64)) -> Filtered {
    Filtered {
        window: VisibleWindow {
            range: 0..data.len(),
            domain,
        },
        outcome: FilterOutcome::WholeData,
    }
}

/// End of a domain starting at `start` that keeps the last item at the pixel
/// position it had when the edge was reached.
fn anchored_end(fallback_end: FallbackEnd, scale: LinearScale, start: f64) -> Option<f64> {
    let (range_start, range_end) = scale.range();
    let end = ((range_end - range_start) / (fallback_end.last_item_px - range_start))
        * (fallback_end.last_item_value - start)
        + start;
    end.is_finite().then_some(end)
}

fn slice_width<T>(slice: &[T], x: &XAccessor<T>, scale: LinearScale, flip: bool) -> f64 {
    let (Some(first), Some(last)) = (slice.first(), slice.last()) else {
        return 0.0;
    };
    let width = (scale.map(x.get(last)) - scale.map(x.get(first))).floor();
    if flip && width < 0.0 { -width } else { width }
}

#[must_use]
pub fn show_min_threshold(width: f64, threshold: f64) -> usize {
    (width * threshold).ceil().max(1.0) as usize
}

#[must_use]
pub fn show_max_threshold(width: f64, threshold: f64) -> usize {
    (width * threshold).floor().max(0.0) as usize
}

fn show_max(width: f64, threshold: f64) -> usize {
    (show_max_threshold(width, threshold) as f64 * 0.97).floor() as usize
}

/// Density gate: strictly more than the minimum and strictly fewer than the
/// maximum displayable count.
#[must_use]
pub fn can_show(width: f64, len: usize, max_threshold: f64, min_threshold: f64) -> bool {
    len > show_min_threshold(width, min_threshold) && len < show_max_threshold(width, max_threshold)
}
