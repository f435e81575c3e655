use tracing::debug;

use crate::core::{FilterHints, SubChartId, YDomain, reset_y_domains, with_y_domain};
use crate::error::{ChartError, ChartResult};
use crate::extensions::EventKind;
use crate::render::Surface;

use super::ViewportController;

impl<T: Sync, S: Surface> ViewportController<T, S> {
    /// Commits an explicit x domain, e.g. from an x axis drag.
    pub fn x_axis_zoom(&mut self, domain: (f64, f64)) -> ChartResult<()> {
        let scale = match self.committed.linear_x_scale("x axis zoom") {
            Ok(scale) => scale,
            Err(err) => return self.inputs().check(Err(err)),
        };
        let hints = FilterHints::with_current(self.committed.window.clone());
        let view = self
            .inputs()
            .for_domain(&self.committed, scale, domain, &hints, None)?;
        self.commit(view, Some(EventKind::XAxisZoom))?;
        self.notify_load_more();
        Ok(())
    }

    /// Pins a sub-chart's y domain; later x changes keep it.
    pub fn y_axis_zoom(&mut self, chart_id: SubChartId, domain: YDomain) -> ChartResult<()> {
        let Some(index) = self
            .committed
            .chart_configs
            .iter()
            .position(|config| config.id == chart_id)
        else {
            return Err(ChartError::UnknownSubChart(chart_id.raw()));
        };
        let next = with_y_domain(&self.committed.chart_configs[index], &domain)?;
        let mut view = self.committed.clone();
        view.chart_configs[index] = next;
        debug!(chart_id = chart_id.raw(), domain = ?domain, "y axis zoom");
        self.commit(view, Some(EventKind::YAxisZoom))
    }

    /// Restores the data-derived y domain of one sub-chart, or of all when
    /// `chart_id` is `None`. Returns `false` when nothing changed.
    pub fn reset_y_domain(&mut self, chart_id: Option<SubChartId>) -> ChartResult<bool> {
        let ids = chart_id.map(|id| [id]);
        let selected = ids.as_ref().map(|ids| ids.as_slice());
        let Some(configs) = reset_y_domains(&self.committed.chart_configs, selected)? else {
            return Ok(false);
        };
        let mut view = self.committed.clone();
        view.chart_configs = configs;
        self.commit(view, Some(EventKind::ResetYDomain))?;
        Ok(true)
    }
}
