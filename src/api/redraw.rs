use tracing::trace;

use crate::core::windowing::current_item_index;
use crate::core::{Dimensions, Point, SubChartId, current_charts};
use crate::error::ChartResult;
use crate::extensions::{DrawRequest, EventKind, MoreProps, Subscriber, should_draw};
use crate::render::{ClearScope, ClipRegion, Surface, SurfaceKind};

use super::frame_scheduler::RedrawRequest;
use super::viewport_controller::PointerState;
use super::{ChartInput, ViewState, ViewportController};

/// Borrowed pieces a [`MoreProps`] snapshot is assembled from.
struct PropsSource<'a, T> {
    dims: Dimensions,
    input: &'a ChartInput<T>,
    view: &'a ViewState<T>,
    pointer: &'a PointerState,
}

impl<'a, T> PropsSource<'a, T> {
    fn props(&self, chart_id: Option<SubChartId>, selected: bool) -> MoreProps<'a, T> {
        let view = self.view;
        let input = self.input;
        let chart_config = chart_id.and_then(|id| view.chart_configs.iter().find(|c| c.id == id));
        let local = |point: Option<Point>| match chart_config {
            Some(config) => point.map(|p| p.offset_by(config.origin)),
            None => point,
        };
        MoreProps {
            width: self.dims.width,
            height: self.dims.height,
            plot_data: view.window.slice(&input.data),
            x_scale: &view.x_scale,
            x_accessor: &input.x_accessor,
            display_x_accessor: input.display_x_accessor(),
            full_data: &input.data,
            chart_config,
            chart_configs: &view.chart_configs,
            mouse_xy: local(self.pointer.mouse_xy),
            start_pos: local(self.pointer.start_pos),
            current_item: self.pointer.current_item.and_then(|i| input.data.get(i)),
            current_charts: &self.pointer.current_charts,
            show: self.pointer.show,
            selected,
        }
    }
}

/// Trigger handed to `subscriber`, or `None` when it sits this redraw out.
fn draw_request<T>(subscriber: &dyn Subscriber<T>, redraw: &RedrawRequest) -> Option<DrawRequest> {
    let matched = redraw
        .triggers
        .iter()
        .copied()
        .find(|trigger| should_draw(subscriber, Some(*trigger), false));
    match matched {
        Some(trigger) => Some(DrawRequest {
            trigger: Some(trigger),
            force: redraw.force,
        }),
        None if should_draw(subscriber, None, redraw.force) => Some(DrawRequest {
            trigger: redraw.triggers.first().copied(),
            force: redraw.force,
        }),
        None => None,
    }
}

impl<T: Sync, S: Surface> ViewportController<T, S> {
    /// Clears every layer and draws every subscriber right away.
    pub fn redraw(&mut self) -> ChartResult<()> {
        self.run_redraw(RedrawRequest::forced(ClearScope::Full, None))
    }

    /// Snapshot handed to a subscriber drawing into `chart_id`.
    pub fn more_props(&self, chart_id: Option<SubChartId>) -> ChartResult<MoreProps<'_, T>> {
        let source = PropsSource {
            dims: self.inputs().dimensions()?,
            input: &self.input,
            view: self.displayed(),
            pointer: &self.pointer,
        };
        Ok(source.props(chart_id, false))
    }

    pub(super) fn run_redraw(&mut self, redraw: RedrawRequest) -> ChartResult<()> {
        for layer in redraw.scope.layers() {
            self.surface.clear(*layer)?;
        }
        let source = PropsSource {
            dims: self.inputs().dimensions()?,
            input: &self.input,
            view: self.transient.as_ref().unwrap_or(&self.committed),
            pointer: &self.pointer,
        };
        let mut drawn = 0_usize;
        for (_, subscriber) in self.subscriptions.iter_mut() {
            let Some(request) = draw_request(&**subscriber, &redraw) else {
                continue;
            };
            let props = source.props(subscriber.chart_id(), subscriber.is_selected());
            subscriber.draw(request, &props, &mut self.surface)?;
            drawn += 1;
        }
        trace!(scope = ?redraw.scope, triggers = ?redraw.triggers, force = redraw.force, drawn, "redraw");
        Ok(())
    }

    /// Delivers `kind` to every subscriber's event hook.
    pub(super) fn broadcast(&mut self, kind: EventKind) -> ChartResult<()> {
        let source = PropsSource {
            dims: self.inputs().dimensions()?,
            input: &self.input,
            view: self.transient.as_ref().unwrap_or(&self.committed),
            pointer: &self.pointer,
        };
        for (_, subscriber) in self.subscriptions.iter_mut() {
            let props = source.props(subscriber.chart_id(), subscriber.is_selected());
            subscriber.on_event(kind, &props);
        }
        Ok(())
    }

    pub(super) fn request_redraw(&mut self, scope: ClearScope, trigger: EventKind) {
        if self.scheduler.schedule_redraw(RedrawRequest::new(scope, trigger)) {
            trace!(trigger = ?trigger, "animation frame requested");
        }
    }

    /// Makes `view` the committed state and queues a full redraw.
    pub(super) fn commit(&mut self, view: ViewState<T>, kind: Option<EventKind>) -> ChartResult<()> {
        self.committed = view;
        self.transient = None;
        self.refresh_pointer();
        self.sync_clip_regions()?;
        if let Some(kind) = kind {
            self.broadcast(kind)?;
        }
        self.scheduler
            .schedule_redraw(RedrawRequest::forced(ClearScope::Full, kind));
        Ok(())
    }

    /// Moves the pointer and recomputes the hovered item and sub-charts.
    pub(super) fn update_pointer(&mut self, position: Point) {
        let view = self.transient.as_ref().unwrap_or(&self.committed);
        let plot_data = view.window.slice(&self.input.data);
        let offset = view.window.range.start;
        self.pointer.current_item =
            current_item_index(&view.x_scale, &self.input.x_accessor, position.x, plot_data)
                .map(|index| index + offset);
        self.pointer.current_charts = current_charts(&view.chart_configs, position);
        self.pointer.mouse_xy = Some(position);
    }

    pub(super) fn refresh_pointer(&mut self) {
        if let Some(position) = self.pointer.mouse_xy {
            self.update_pointer(position);
        }
    }

    pub(super) fn sync_clip_regions(&mut self) -> ChartResult<()> {
        if self.surface.kind() != SurfaceKind::Vector {
            return Ok(());
        }
        let margin = self.input.margin;
        let regions: Vec<ClipRegion> = self
            .committed
            .chart_configs
            .iter()
            .map(|config| ClipRegion {
                chart_id: config.id,
                x: margin.left + config.origin.x,
                y: margin.top + config.origin.y,
                width: config.width,
                height: config.height,
            })
            .collect();
        self.surface.set_clip_regions(&regions)
    }
}
