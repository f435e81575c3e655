use serde::{Deserialize, Serialize};

use crate::core::{Point, Scale, SubChartConfig, SubChartId, XAccessor};
use crate::error::ChartResult;
use crate::interaction::PanConditions;
use crate::render::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Events broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MouseEnter,
    MouseLeave,
    MouseMove,
    MouseDown,
    Click,
    DoubleClick,
    ContextMenu,
    Zoom,
    Pan,
    PanEnd,
    PinchZoom,
    PinchZoomEnd,
    DragStart,
    Drag,
    DragEnd,
    DragCancel,
    XAxisZoom,
    YAxisZoom,
    ResetYDomain,
}

impl EventKind {
    /// Trigger a subscriber's `draw_on` list is matched against.
    #[must_use]
    pub fn draw_alias(self) -> Self {
        match self {
            Self::MouseLeave
            | Self::MouseDown
            | Self::Click
            | Self::ContextMenu
            | Self::DoubleClick => Self::MouseMove,
            Self::PanEnd | Self::PinchZoom => Self::Pan,
            Self::DragStart | Self::DragEnd | Self::DragCancel => Self::Drag,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRequest {
    pub trigger: Option<EventKind>,
    pub force: bool,
}

/// Everything a subscriber needs to project data, handed over explicitly.
///
/// Pointer positions are local to the subscriber's sub-chart origin when
/// `chart_config` is set, plot-area relative otherwise.
pub struct MoreProps<'a, T> {
    pub width: f64,
    pub height: f64,
    pub plot_data: &'a [T],
    pub x_scale: &'a Scale,
    pub x_accessor: &'a XAccessor<T>,
    pub display_x_accessor: &'a XAccessor<T>,
    pub full_data: &'a [T],
    pub chart_config: Option<&'a SubChartConfig<T>>,
    pub chart_configs: &'a [SubChartConfig<T>],
    pub mouse_xy: Option<Point>,
    pub start_pos: Option<Point>,
    pub current_item: Option<&'a T>,
    pub current_charts: &'a [SubChartId],
    pub show: bool,
    pub selected: bool,
}

/// Renderer registered with the controller.
///
/// Subscribers observe every broadcast through `on_event` and draw only when
/// their `draw_on` list matches the trigger, when selected, or when forced.
pub trait Subscriber<T> {
    /// Sub-chart the subscriber draws into; `None` for viewport-wide overlays.
    fn chart_id(&self) -> Option<SubChartId> {
        None
    }

    /// `None` draws on every trigger.
    fn draw_on(&self) -> Option<&[EventKind]> {
        None
    }

    fn is_selected(&self) -> bool {
        false
    }

    fn pan_conditions(&self) -> PanConditions {
        PanConditions::default()
    }

    fn on_event(&mut self, _kind: EventKind, _props: &MoreProps<'_, T>) {}

    fn draw(
        &mut self,
        request: DrawRequest,
        props: &MoreProps<'_, T>,
        surface: &mut dyn Surface,
    ) -> ChartResult<()>;
}

/// Whether a subscriber draws for `trigger`.
#[must_use]
pub fn should_draw<T>(
    subscriber: &dyn Subscriber<T>,
    trigger: Option<EventKind>,
    force: bool,
) -> bool {
    if force || subscriber.is_selected() {
        return true;
    }
    match (subscriber.draw_on(), trigger) {
        (None, _) => true,
        (Some(kinds), Some(trigger)) => kinds.contains(&trigger.draw_alias()),
        (Some(_), None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawRequest, EventKind, MoreProps, Subscriber, should_draw};
    use crate::error::ChartResult;
    use crate::render::Surface;

    struct HoverOnly;

    impl Subscriber<f64> for HoverOnly {
        fn draw_on(&self) -> Option<&[EventKind]> {
            Some(&[EventKind::MouseMove])
        }

        fn draw(
            &mut self,
            _request: DrawRequest,
            _props: &MoreProps<'_, f64>,
            _surface: &mut dyn Surface,
        ) -> ChartResult<()> {
            Ok(())
        }
    }

    #[test]
    fn aliases_collapse_onto_base_triggers() {
        assert_eq!(EventKind::DoubleClick.draw_alias(), EventKind::MouseMove);
        assert_eq!(EventKind::PinchZoom.draw_alias(), EventKind::Pan);
        assert_eq!(EventKind::DragCancel.draw_alias(), EventKind::Drag);
        assert_eq!(EventKind::Zoom.draw_alias(), EventKind::Zoom);
    }

    #[test]
    fn draw_gate_matches_aliased_trigger_or_force() {
        let hover = HoverOnly;
        assert!(should_draw(&hover, Some(EventKind::MouseLeave), false));
        assert!(!should_draw(&hover, Some(EventKind::Pan), false));
        assert!(!should_draw(&hover, None, false));
        assert!(should_draw(&hover, Some(EventKind::Pan), true));
    }
}
