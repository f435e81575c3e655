use smallvec::SmallVec;
use tracing::debug;

use crate::core::{DataFilter, LinearScale, Point, SubChartId};
use crate::error::ChartResult;
use crate::extensions::{Subscriber, SubscriptionId};
use crate::interaction::{InteractionDispatcher, PanConditions};
use crate::render::{ClearScope, Surface};

use super::frame_scheduler::RedrawRequest;
use super::view_state::ViewInputs;
use super::{
    ChangeKind, ChartInput, FrameScheduler, ResetReason, SubscriptionRegistry, ViewState,
    ViewportConfig, classify_change,
};

/// Host callback asked for older data: `(domain_start, first_item_x)`.
pub type LoadMoreFn = Box<dyn FnMut(f64, f64)>;

/// Pointer state kept between events and handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PointerState {
    pub(super) mouse_xy: Option<Point>,
    pub(super) start_pos: Option<Point>,
    /// Index into the full dataset.
    pub(super) current_item: Option<usize>,
    pub(super) current_charts: SmallVec<[SubChartId; 4]>,
    pub(super) show: bool,
}

/// Gesture the controller is currently reducing.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum GestureSession {
    Pan {
        start_scale: LinearScale,
        charts: SmallVec<[SubChartId; 4]>,
    },
    Pinch {
        start_scale: LinearScale,
        initial: (Point, Point),
    },
    Drag,
}

/// Owns the committed view of one chart and coordinates every change to it.
///
/// Hosts feed raw input through [`ViewportController::handle_input`], drive
/// timers with [`ViewportController::advance_time`] and run queued work from
/// their animation-frame callback via
/// [`ViewportController::on_animation_frame`].
pub struct ViewportController<T, S: Surface> {
    pub(super) surface: S,
    pub(super) config: ViewportConfig,
    pub(super) filter: DataFilter,
    pub(super) input: ChartInput<T>,
    pub(super) committed: ViewState<T>,
    /// In-flight pan or pinch view; drawn but not committed.
    pub(super) transient: Option<ViewState<T>>,
    pub(super) gesture: Option<GestureSession>,
    pub(super) pointer: PointerState,
    pub(super) dispatcher: InteractionDispatcher,
    pub(super) scheduler: FrameScheduler,
    pub(super) subscriptions: SubscriptionRegistry<T>,
    pub(super) load_more: Option<LoadMoreFn>,
    pub(super) pending_input: Option<ChartInput<T>>,
    pub(super) pending_config_reset: bool,
}

impl<T: Sync, S: Surface> ViewportController<T, S> {
    /// Validates `config` and builds the initial view from `input`.
    pub fn new(surface: S, config: ViewportConfig, input: ChartInput<T>) -> ChartResult<Self> {
        config.validate()?;
        let filter = DataFilter::new(config.filter_settings(), config.custom_clamp.clone());
        let committed = ViewInputs {
            config: &config,
            filter: &filter,
            input: &input,
        }
        .reset()?;
        let dispatcher = InteractionDispatcher::new(config.dispatcher_settings());
        let mut controller = Self {
            surface,
            config,
            filter,
            input,
            committed,
            transient: None,
            gesture: None,
            pointer: PointerState::default(),
            dispatcher,
            scheduler: FrameScheduler::default(),
            subscriptions: SubscriptionRegistry::default(),
            load_more: None,
            pending_input: None,
            pending_config_reset: false,
        };
        controller.sync_clip_regions()?;
        controller
            .scheduler
            .schedule_redraw(RedrawRequest::forced(ClearScope::Full, None));
        Ok(controller)
    }

    pub(super) fn inputs(&self) -> ViewInputs<'_, T> {
        ViewInputs {
            config: &self.config,
            filter: &self.filter,
            input: &self.input,
        }
    }

    /// Applies new host inputs.
    ///
    /// While a pan or pinch is in progress the inputs are held back and
    /// applied once the gesture commits; `NoOp` is returned in that case.
    pub fn set_input(&mut self, input: ChartInput<T>) -> ChartResult<ChangeKind> {
        if self.pan_in_progress() {
            debug!(series = %input.series_key, "input deferred until gesture end");
            self.pending_input = Some(input);
            return Ok(ChangeKind::NoOp);
        }
        let interactive = self.committed.is_interactive(&self.input);
        let change = classify_change(Some(&self.input), &input, interactive);
        let inputs = ViewInputs {
            config: &self.config,
            filter: &self.filter,
            input: &input,
        };
        let view = match change {
            ChangeKind::NoOp => {
                self.input = input;
                return Ok(change);
            }
            ChangeKind::Reset(_) => inputs.reset()?,
            ChangeKind::Update(_) => inputs.update(&self.committed, &self.input.data)?,
        };
        debug!(change = ?change, "inputs applied");
        self.input = input;
        self.commit(view, None)?;
        Ok(change)
    }

    /// Replaces the configuration and rebuilds the view from scratch.
    pub fn set_config(&mut self, config: ViewportConfig) -> ChartResult<ChangeKind> {
        config.validate()?;
        self.filter = DataFilter::new(config.filter_settings(), config.custom_clamp.clone());
        self.dispatcher.set_settings(config.dispatcher_settings());
        self.config = config;
        if self.pan_in_progress() {
            debug!("config reset deferred until gesture end");
            self.pending_config_reset = true;
            return Ok(ChangeKind::NoOp);
        }
        let view = self.inputs().reset()?;
        self.commit(view, None)?;
        Ok(ChangeKind::Reset(ResetReason::ConfigChanged))
    }

    /// Applies inputs and config held back during a gesture.
    pub(super) fn apply_pending(&mut self) -> ChartResult<()> {
        if std::mem::take(&mut self.pending_config_reset) {
            let view = self.inputs().reset()?;
            self.commit(view, None)?;
        }
        if let Some(input) = self.pending_input.take() {
            self.set_input(input)?;
        }
        Ok(())
    }

    pub fn set_load_more_handler(&mut self, handler: impl FnMut(f64, f64) + 'static) {
        self.load_more = Some(Box::new(handler));
    }

    pub fn clear_load_more_handler(&mut self) {
        self.load_more = None;
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber<T>>) -> SubscriptionId {
        self.subscriptions.register(subscriber)
    }

    /// Returns `true` when the subscriber was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unregister(id).is_some()
    }

    /// Drops every subscriber; nothing is drawn afterwards.
    pub fn unsubscribe_all(&mut self) {
        self.subscriptions.clear();
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.count()
    }

    #[must_use]
    pub fn has_subscription(&self, id: SubscriptionId) -> bool {
        self.subscriptions.has(id)
    }

    /// Whether `id` is the most recently registered draggable subscriber.
    #[must_use]
    pub fn am_i_on_top(&self, id: SubscriptionId) -> bool {
        self.subscriptions.topmost_draggable() == Some(id)
    }

    pub(super) fn pan_conditions(&self) -> PanConditions {
        PanConditions::aggregate(
            self.config.pan_event && !self.config.disable_interaction,
            self.subscriptions.pan_conditions(),
        )
    }

    /// View currently on screen: the in-flight gesture view if any.
    pub(super) fn displayed(&self) -> &ViewState<T> {
        self.transient.as_ref().unwrap_or(&self.committed)
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
