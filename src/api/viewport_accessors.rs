use crate::core::{Dimensions, Point, Scale, SubChartConfig, SubChartId};
use crate::error::ChartResult;
use crate::render::Surface;

use super::viewport_controller::GestureSession;
use super::{ChartInput, ViewState, ViewportConfig, ViewportController};

impl<T: Sync, S: Surface> ViewportController<T, S> {
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    #[must_use]
    pub fn input(&self) -> &ChartInput<T> {
        &self.input
    }

    /// Last committed view. During a pan this lags behind what is drawn.
    #[must_use]
    pub fn committed_view(&self) -> &ViewState<T> {
        &self.committed
    }

    #[must_use]
    pub fn x_scale(&self) -> &Scale {
        &self.displayed().x_scale
    }

    #[must_use]
    pub fn x_domain(&self) -> (f64, f64) {
        self.displayed().window.domain
    }

    /// Index range of the visible items within the full dataset.
    #[must_use]
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        self.displayed().window.range.clone()
    }

    #[must_use]
    pub fn plot_data(&self) -> &[T] {
        self.displayed().window.slice(&self.input.data)
    }

    #[must_use]
    pub fn full_data(&self) -> &[T] {
        &self.input.data
    }

    #[must_use]
    pub fn chart_configs(&self) -> &[SubChartConfig<T>] {
        &self.displayed().chart_configs
    }

    #[must_use]
    pub fn chart_config(&self, id: SubChartId) -> Option<&SubChartConfig<T>> {
        self.chart_configs().iter().find(|config| config.id == id)
    }

    pub fn dimensions(&self) -> ChartResult<Dimensions> {
        self.inputs().dimensions()
    }

    #[must_use]
    pub fn mouse_xy(&self) -> Option<Point> {
        self.pointer.mouse_xy
    }

    /// Item nearest to the pointer, if the pointer has been seen.
    #[must_use]
    pub fn current_item(&self) -> Option<&T> {
        self.pointer
            .current_item
            .and_then(|index| self.input.data.get(index))
    }

    #[must_use]
    pub fn current_item_index(&self) -> Option<usize> {
        self.pointer.current_item
    }

    #[must_use]
    pub fn current_charts(&self) -> &[SubChartId] {
        &self.pointer.current_charts
    }

    /// Pan or pinch session active; commits from other sources are held back.
    #[must_use]
    pub fn pan_in_progress(&self) -> bool {
        matches!(
            self.gesture,
            Some(GestureSession::Pan { .. } | GestureSession::Pinch { .. })
        )
    }

    #[must_use]
    pub fn drag_in_progress(&self) -> bool {
        matches!(self.gesture, Some(GestureSession::Drag))
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
