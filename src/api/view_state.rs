use tracing::{debug, warn};

use crate::core::windowing::ensure_sorted;
use crate::core::{
    DataFilter, Dimensions, ExtentsInput, FallbackEnd, FilterHints, LinearScale, OrdinalScale,
    Scale, ScaleKind, SubChartConfig, VisibleWindow, XPadding, YPan, resolve_sub_chart_configs,
    update_y_scales,
};
use crate::error::{ChartError, ChartResult};

use super::{ChartInput, ViewportConfig};

/// Committed (or in-flight) x scale, visible window and sub-chart scales.
pub struct ViewState<T> {
    pub x_scale: Scale,
    pub window: VisibleWindow,
    pub chart_configs: Vec<SubChartConfig<T>>,
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        Self {
            x_scale: self.x_scale.clone(),
            window: self.window.clone(),
            chart_configs: self.chart_configs.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ViewState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("x_scale", &self.x_scale)
            .field("window", &self.window)
            .field("chart_configs", &self.chart_configs)
            .finish()
    }
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.window.domain
    }

    pub(super) fn linear_x_scale(&self, operation: &'static str) -> ChartResult<LinearScale> {
        self.x_scale.as_linear(operation)
    }

    /// Whether pan and zoom can operate on this view.
    #[must_use]
    pub fn is_interactive(&self, input: &ChartInput<T>) -> bool {
        let Scale::Linear(scale) = &self.x_scale else {
            return false;
        };
        self.window
            .slice(&input.data)
            .first()
            .is_some_and(|item| scale.map(input.x_accessor.get(item)).is_finite())
    }
}

/// Everything a view computation reads besides the previous view.
pub(super) struct ViewInputs<'a, T> {
    pub config: &'a ViewportConfig,
    pub filter: &'a DataFilter,
    pub input: &'a ChartInput<T>,
}

impl<'a, T: Sync> ViewInputs<'a, T> {
    pub fn dimensions(&self) -> ChartResult<Dimensions> {
        Dimensions::inner(self.input.viewport, self.input.margin)
    }

    pub fn extents_input(&self, window: &VisibleWindow) -> ExtentsInput<'a, T> {
        ExtentsInput {
            plot_data: window.slice(&self.input.data),
            x_domain: window.domain,
            x_accessor: &self.input.x_accessor,
            display_x_accessor: self.input.display_x_accessor(),
            full_data: &self.input.data,
        }
    }

    /// Builds the view from scratch out of the x extents policy.
    pub fn reset(&self) -> ChartResult<ViewState<T>> {
        let data = &self.input.data[..];
        let x = &self.input.x_accessor;
        if self.config.x_scale_kind == ScaleKind::Linear {
            self.check(ensure_sorted(data, x))?;
        }
        let dims = self.dimensions()?;
        let extent = self.input.x_extents.resolve(data, x)?;
        let scale = self.build_x_scale(dims)?;
        let filtered = self
            .filter
            .filter(data, extent, x, &scale, &FilterHints::default())?;
        if filtered.window.len() <= 1 {
            self.check(Err(ChartError::DegenerateWindow {
                len: filtered.window.len(),
            }))?;
        }
        let x_scale = with_x_domain(&scale, filtered.window.domain)?;
        let configs = self.resolve_configs(dims, &[])?;
        let chart_configs = update_y_scales(&configs, &self.extents_input(&filtered.window), None)?;
        debug!(
            domain = ?filtered.window.domain,
            points = filtered.window.len(),
            outcome = ?filtered.outcome,
            "chart reset"
        );
        Ok(ViewState {
            x_scale,
            window: filtered.window,
            chart_configs,
        })
    }

    /// Recomputes the view for new dimensions or data without resetting.
    ///
    /// When the last item of `previous_data` was visible and new items were
    /// appended past the domain end, the view sticks to the end. Otherwise
    /// the domain end is kept and the start follows the new width.
    pub fn update(&self, previous: &ViewState<T>, previous_data: &[T]) -> ChartResult<ViewState<T>> {
        let Scale::Linear(initial) = &previous.x_scale else {
            return self.reset();
        };
        let initial = *initial;
        let data = &self.input.data[..];
        let x = &self.input.x_accessor;
        let Some(last_item) = data.last() else {
            return self.reset();
        };
        self.check(ensure_sorted(data, x))?;

        let dims = self.dimensions()?;
        let Scale::Linear(updated) = self.build_x_scale(dims)? else {
            return self.reset();
        };
        let (start, end) = previous.window.domain;
        let last_item_was_visible = previous_data
            .last()
            .map(|item| x.get(item))
            .is_some_and(|value| value <= end && value >= start);
        let last_x = x.get(last_item);

        let filtered = if !last_item_was_visible || end >= last_x {
            let (range_start, range_end) = initial.range();
            let (new_range_start, new_range_end) = updated.range();
            let extent = ((new_range_end - new_range_start) / (range_end - range_start)) * (end - start);
            let new_start = if self.config.maintain_points_per_pixel_on_resize {
                end - extent
            } else {
                start
            };
            let hints = FilterHints {
                current: None,
                fallback_start: Some(start),
                fallback_end: Some(FallbackEnd {
                    last_item_value: last_x,
                    last_item_px: initial.map(last_x),
                }),
            };
            self.filter
                .filter(data, (new_start, end), x, &Scale::Linear(updated), &hints)?
        } else {
            let (range_start, range_end) = initial.range();
            let dx = initial.map(last_x) - range_end;
            let domain = initial.invert_range((range_start + dx, range_end + dx))?;
            self.filter.filter(
                data,
                domain,
                x,
                &Scale::Linear(updated),
                &FilterHints::default(),
            )?
        };

        let x_scale = Scale::Linear(updated.with_domain(filtered.window.domain)?);
        let configs = self.resolve_configs(dims, &previous.chart_configs)?;
        let chart_configs = update_y_scales(&configs, &self.extents_input(&filtered.window), None)?;
        debug!(
            last_item_was_visible,
            domain = ?filtered.window.domain,
            points = filtered.window.len(),
            "incremental update"
        );
        Ok(ViewState {
            x_scale,
            window: filtered.window,
            chart_configs,
        })
    }

    /// Filters for `domain` against `base_scale` and refreshes the y scales
    /// of `base` for the resulting window.
    pub fn for_domain(
        &self,
        base: &ViewState<T>,
        base_scale: LinearScale,
        domain: (f64, f64),
        hints: &FilterHints,
        y_pan: Option<YPan<'_>>,
    ) -> ChartResult<ViewState<T>> {
        let filtered = self.filter.filter(
            &self.input.data,
            domain,
            &self.input.x_accessor,
            &Scale::Linear(base_scale),
            hints,
        )?;
        let x_scale = Scale::Linear(base_scale.with_domain(filtered.window.domain)?);
        let chart_configs = update_y_scales(
            &base.chart_configs,
            &self.extents_input(&filtered.window),
            y_pan,
        )?;
        Ok(ViewState {
            x_scale,
            window: filtered.window,
            chart_configs,
        })
    }

    fn build_x_scale(&self, dims: Dimensions) -> ChartResult<Scale> {
        build_x_scale(
            self.config.x_scale_kind,
            dims.width,
            self.config.x_padding,
            self.config.flip_x_scale,
            self.input.data.iter().map(|item| self.input.x_accessor.get(item)),
        )
    }

    fn resolve_configs(
        &self,
        dims: Dimensions,
        existing: &[SubChartConfig<T>],
    ) -> ChartResult<Vec<SubChartConfig<T>>> {
        let resolved = resolve_sub_chart_configs(dims, &self.input.sub_charts, existing)?;
        if let Some(chart_id) = resolved.missing_extents.first() {
            self.check(Err(ChartError::MissingYExtents {
                chart_id: chart_id.raw(),
            }))?;
        }
        Ok(resolved.configs)
    }

    /// Applies the validation mode to a configuration check.
    pub fn check(&self, result: ChartResult<()>) -> ChartResult<()> {
        match result {
            Err(err) if !self.config.validation.is_strict() => {
                warn!(error = %err, "configuration error ignored in lenient mode");
                Ok(())
            }
            other => other,
        }
    }
}

/// X scale spanning the plot width; ordinal scales take the x values as slots.
pub fn build_x_scale(
    kind: ScaleKind,
    width: f64,
    padding: XPadding,
    flip: bool,
    values: impl Iterator<Item = f64>,
) -> ChartResult<Scale> {
    match kind {
        ScaleKind::Linear => {
            let (left, right) = padding.sides();
            let range = if flip {
                (width - right, left)
            } else {
                (left, width - right)
            };
            LinearScale::new((0.0, 1.0), range).map(Scale::Linear)
        }
        ScaleKind::Ordinal => {
            let Some(padding) = padding.symmetric() else {
                return Err(ChartError::InvalidConfig(
                    "padding must be a number for ordinal scale".to_owned(),
                ));
            };
            let range = if flip { (width, 0.0) } else { (0.0, width) };
            OrdinalScale::new(values, range, padding / 2.0).map(Scale::Ordinal)
        }
    }
}

fn with_x_domain(scale: &Scale, domain: (f64, f64)) -> ChartResult<Scale> {
    match scale {
        Scale::Linear(scale) => scale.with_domain(domain).map(Scale::Linear),
        Scale::Ordinal(_) => Ok(scale.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::build_x_scale;
    use crate::core::{Scale, ScaleKind, XPadding};

    #[test]
    fn linear_x_range_honours_padding_and_flip() {
        let scale = build_x_scale(
            ScaleKind::Linear,
            100.0,
            XPadding::Sides {
                left: 5.0,
                right: 10.0,
            },
            false,
            std::iter::empty(),
        )
        .expect("scale");
        assert_eq!(scale.range(), (5.0, 90.0));

        let flipped = build_x_scale(
            ScaleKind::Linear,
            100.0,
            XPadding::Symmetric(0.0),
            true,
            std::iter::empty(),
        )
        .expect("scale");
        assert_eq!(flipped.range(), (100.0, 0.0));
    }

    #[test]
    fn ordinal_x_requires_symmetric_padding() {
        let err = build_x_scale(
            ScaleKind::Ordinal,
            100.0,
            XPadding::Sides {
                left: 1.0,
                right: 2.0,
            },
            false,
            [1.0, 2.0].into_iter(),
        );
        assert!(err.is_err());

        let scale = build_x_scale(
            ScaleKind::Ordinal,
            100.0,
            XPadding::Symmetric(0.0),
            false,
            [1.0, 2.0, 3.0].into_iter(),
        )
        .expect("ordinal");
        assert!(matches!(scale, Scale::Ordinal(ref s) if s.len() == 3));
    }
}
