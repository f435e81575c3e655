use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::Point;

use super::events::{
    GestureEvent, InputEvent, PanConditions, PointerButton, PointerSource, Touches, ZoomDirection,
};

pub type Gestures = SmallVec<[GestureEvent; 4]>;

/// Which input classes the dispatcher honours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatcherSettings {
    pub mouse_move: bool,
    pub pan: bool,
    pub zoom: bool,
    pub disabled: bool,
    pub double_click_window_ms: f64,
    pub wheel_pan_end_delay_ms: f64,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            mouse_move: true,
            pan: true,
            zoom: true,
            disabled: false,
            double_click_window_ms: 400.0,
            wheel_pan_end_delay_ms: 100.0,
        }
    }
}

/// Window-level listeners installed for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListenerSet {
    None,
    Hover,
    MousePan,
    MouseDrag,
    TouchPan,
    Pinch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanTrack {
    origin: Point,
    last: Point,
    dx: f64,
    dy: f64,
}

impl PanTrack {
    fn new(origin: Point) -> Self {
        Self {
            origin,
            last: origin,
            dx: 0.0,
            dy: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Session {
    Idle,
    MousePan(PanTrack),
    TouchPan(PanTrack),
    WheelPan { track: PanTrack, deadline_ms: f64 },
    Drag { start: Point },
    Pinch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingClick {
    position: Point,
    deadline_ms: f64,
}

/// Turns raw pointer/touch input into one gesture stream.
///
/// Sessions are exclusive: a mouse pan, a mouse drag, a touch pan, a wheel
/// pan burst or a pinch. Timers are driven by the host through the `now_ms`
/// arguments and `advance_time`.
#[derive(Debug, Clone)]
pub struct InteractionDispatcher {
    settings: DispatcherSettings,
    session: Session,
    focus: bool,
    mouse_inside: bool,
    mouse_interaction: bool,
    pan_happened: bool,
    drag_happened: bool,
    pending_click: Option<PendingClick>,
}

impl Default for InteractionDispatcher {
    fn default() -> Self {
        Self::new(DispatcherSettings::default())
    }
}

impl InteractionDispatcher {
    #[must_use]
    pub fn new(settings: DispatcherSettings) -> Self {
        Self {
            settings,
            session: Session::Idle,
            focus: true,
            mouse_inside: false,
            mouse_interaction: true,
            pan_happened: false,
            drag_happened: false,
            pending_click: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> DispatcherSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: DispatcherSettings) {
        self.settings = settings;
    }

    pub fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }

    #[must_use]
    pub fn pan_in_progress(&self) -> bool {
        matches!(
            self.session,
            Session::MousePan(_) | Session::TouchPan(_) | Session::WheelPan { .. }
        )
    }

    #[must_use]
    pub fn pinch_in_progress(&self) -> bool {
        matches!(self.session, Session::Pinch)
    }

    #[must_use]
    pub fn drag_in_progress(&self) -> bool {
        matches!(self.session, Session::Drag { .. })
    }

    #[must_use]
    pub fn listeners(&self) -> ListenerSet {
        match self.session {
            Session::MousePan(_) => ListenerSet::MousePan,
            Session::TouchPan(_) => ListenerSet::TouchPan,
            Session::Drag { .. } => ListenerSet::MouseDrag,
            Session::Pinch => ListenerSet::Pinch,
            Session::Idle | Session::WheelPan { .. } => {
                if self.mouse_inside && self.mouse_interaction {
                    ListenerSet::Hover
                } else {
                    ListenerSet::None
                }
            }
        }
    }

    /// Earliest pending timer deadline, if any.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        let wheel = match self.session {
            Session::WheelPan { deadline_ms, .. } => Some(deadline_ms),
            _ => None,
        };
        let click = self.pending_click.map(|click| click.deadline_ms);
        match (wheel, click) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires expired timers: deferred single clicks and wheel pan ends.
    pub fn advance_time(&mut self, now_ms: f64) -> Gestures {
        let mut out = Gestures::new();
        if let Some(click) = self.pending_click {
            if now_ms >= click.deadline_ms {
                self.pending_click = None;
                out.push(GestureEvent::Click {
                    position: click.position,
                });
            }
        }
        if let Session::WheelPan { track, deadline_ms } = self.session {
            if now_ms >= deadline_ms {
                self.finish_pan(track, &mut out);
            }
        }
        out
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        pan_conditions: PanConditions,
        now_ms: f64,
    ) -> Gestures {
        let mut out = self.advance_time(now_ms);
        trace!(event = ?event, session = ?self.session, "dispatch input");
        match event {
            InputEvent::MouseEnter => {
                self.mouse_inside = true;
                out.push(GestureEvent::MouseEnter);
            }
            InputEvent::MouseLeave => {
                self.mouse_inside = false;
                out.push(GestureEvent::MouseLeave);
            }
            InputEvent::MouseMove { position } => self.on_mouse_move(*position, &mut out),
            InputEvent::MouseDown { position, button } => {
                self.on_mouse_down(*position, *button, pan_conditions, &mut out);
            }
            InputEvent::MouseUp { position } => self.on_mouse_up(*position, &mut out),
            InputEvent::Click { position } => self.on_click(*position, now_ms, &mut out),
            InputEvent::ContextMenu { position } => self.on_context_menu(*position, &mut out),
            InputEvent::Wheel { position, dx, dy } => {
                self.on_wheel(*position, *dx, *dy, now_ms, &mut out);
            }
            InputEvent::TouchStart { touches } => self.on_touch_start(touches, &mut out),
            InputEvent::TouchMove { touches } => self.on_touch_move(touches, &mut out),
            InputEvent::TouchEnd { touches } => self.on_touch_end(touches, &mut out),
        }
        out
    }

    fn on_mouse_move(&mut self, position: Point, out: &mut Gestures) {
        if !self.mouse_interaction {
            return;
        }
        match &mut self.session {
            Session::MousePan(track) => {
                self.pan_happened = true;
                track.last = position;
                track.dx = position.x - track.origin.x;
                track.dy = position.y - track.origin.y;
                out.push(GestureEvent::Pan {
                    position,
                    dx: track.dx,
                    dy: track.dy,
                });
            }
            Session::Drag { start } => {
                self.drag_happened = true;
                out.push(GestureEvent::Drag {
                    start: *start,
                    position,
                });
            }
            Session::Idle => {
                if self.settings.mouse_move && !self.settings.disabled {
                    out.push(GestureEvent::MouseMove {
                        position,
                        source: PointerSource::Mouse,
                    });
                }
            }
            Session::TouchPan(_) | Session::WheelPan { .. } | Session::Pinch => {}
        }
    }

    fn on_mouse_down(
        &mut self,
        position: Point,
        button: PointerButton,
        conditions: PanConditions,
        out: &mut Gestures,
    ) {
        if button != PointerButton::Primary || self.settings.disabled {
            return;
        }
        self.pan_happened = false;
        self.drag_happened = false;
        self.focus = true;
        if self.session != Session::Idle || !self.mouse_interaction {
            return;
        }
        if self.settings.pan && conditions.pan_enabled && !conditions.draggable {
            self.session = Session::MousePan(PanTrack::new(position));
            out.push(GestureEvent::PanStart { origin: position });
        } else if conditions.draggable {
            self.session = Session::Drag { start: position };
            out.push(GestureEvent::DragStart { start: position });
        }
        out.push(GestureEvent::MouseDown { position });
    }

    fn on_mouse_up(&mut self, position: Point, out: &mut Gestures) {
        match self.session {
            Session::MousePan(mut track) => {
                track.last = position;
                self.finish_pan(track, out);
            }
            Session::Drag { .. } => {
                self.session = Session::Idle;
                out.push(GestureEvent::DragEnd { position });
            }
            _ => {}
        }
    }

    fn on_click(&mut self, position: Point, now_ms: f64, out: &mut Gestures) {
        if self.settings.disabled || self.pan_happened || self.drag_happened {
            return;
        }
        match self.pending_click.take() {
            Some(pending) if now_ms < pending.deadline_ms => {
                out.push(GestureEvent::DoubleClick { position });
            }
            _ => {
                self.pending_click = Some(PendingClick {
                    position,
                    deadline_ms: now_ms + self.settings.double_click_window_ms,
                });
            }
        }
    }

    fn on_context_menu(&mut self, position: Point, out: &mut Gestures) {
        if self.settings.disabled {
            return;
        }
        match self.session {
            Session::MousePan(track)
            | Session::TouchPan(track)
            | Session::WheelPan { track, .. } => self.finish_pan(track, out),
            // The controller reports the drag as cancelled.
            Session::Drag { .. } => self.session = Session::Idle,
            _ => {}
        }
        out.push(GestureEvent::ContextMenu { position });
    }

    fn on_wheel(&mut self, position: Point, dx: f64, dy: f64, now_ms: f64, out: &mut Gestures) {
        if self.settings.disabled {
            return;
        }
        let y_zoom = dy.abs() > dx.abs() && dy.abs() > 0.0;
        if self.settings.zoom && self.focus && y_zoom && !self.pan_in_progress() {
            let direction = if dy > 0.0 {
                ZoomDirection::Out
            } else {
                ZoomDirection::In
            };
            out.push(GestureEvent::Zoom {
                direction,
                position,
            });
            return;
        }
        if !self.focus || !self.settings.pan {
            return;
        }
        let deadline_ms = now_ms + self.settings.wheel_pan_end_delay_ms;
        match &mut self.session {
            Session::WheelPan {
                track,
                deadline_ms: current,
            } => {
                self.pan_happened = true;
                track.last = position;
                track.dx += dx;
                track.dy += dy;
                *current = deadline_ms;
                out.push(GestureEvent::Pan {
                    position,
                    dx: track.dx,
                    dy: track.dy,
                });
            }
            Session::Idle => {
                self.pan_happened = false;
                self.session = Session::WheelPan {
                    track: PanTrack::new(position),
                    deadline_ms,
                };
                out.push(GestureEvent::PanStart { origin: position });
            }
            // Pointer pans recompute their delta from the origin on every
            // move, so a wheel tick has nothing to accumulate into.
            Session::MousePan(_) | Session::TouchPan(_) => {
                trace!(dx, dy, "wheel tick ignored during pointer pan");
            }
            Session::Drag { .. } | Session::Pinch => {}
        }
    }

    fn on_touch_start(&mut self, touches: &Touches, out: &mut Gestures) {
        if self.settings.disabled {
            return;
        }
        self.mouse_interaction = false;
        match touches.as_slice() {
            [touch] => {
                if self.session != Session::Idle {
                    return;
                }
                self.pan_happened = false;
                out.push(GestureEvent::MouseMove {
                    position: *touch,
                    source: PointerSource::Touch,
                });
                if self.settings.pan {
                    self.session = Session::TouchPan(PanTrack::new(*touch));
                    out.push(GestureEvent::PanStart { origin: *touch });
                }
            }
            [touch1, touch2, ..] => {
                if !self.settings.zoom || self.pinch_in_progress() || self.drag_in_progress() {
                    return;
                }
                match self.session {
                    Session::MousePan(track)
                    | Session::TouchPan(track)
                    | Session::WheelPan { track, .. } => self.finish_pan(track, out),
                    _ => {}
                }
                self.session = Session::Pinch;
                out.push(GestureEvent::PinchStart {
                    touch1: *touch1,
                    touch2: *touch2,
                });
            }
            [] => {}
        }
    }

    fn on_touch_move(&mut self, touches: &Touches, out: &mut Gestures) {
        match (&mut self.session, touches.as_slice()) {
            (Session::TouchPan(track), [position, ..]) => {
                self.pan_happened = true;
                track.last = *position;
                track.dx = position.x - track.origin.x;
                track.dy = position.y - track.origin.y;
                out.push(GestureEvent::Pan {
                    position: *position,
                    dx: track.dx,
                    dy: track.dy,
                });
            }
            (Session::Pinch, [touch1, touch2, ..]) => {
                out.push(GestureEvent::PinchZoom {
                    touch1: *touch1,
                    touch2: *touch2,
                });
            }
            (Session::Idle, [position, ..]) => {
                if self.settings.mouse_move && !self.settings.disabled {
                    out.push(GestureEvent::MouseMove {
                        position: *position,
                        source: PointerSource::Touch,
                    });
                }
            }
            _ => {}
        }
    }

    fn on_touch_end(&mut self, remaining: &Touches, out: &mut Gestures) {
        match self.session {
            Session::TouchPan(track) => {
                if remaining.is_empty() {
                    self.finish_pan(track, out);
                    self.mouse_interaction = true;
                }
            }
            Session::Pinch => {
                if remaining.len() >= 2 {
                    return;
                }
                out.push(GestureEvent::PinchZoomEnd);
                self.session = Session::Idle;
                match remaining.first() {
                    Some(touch) if self.settings.pan => {
                        self.pan_happened = false;
                        self.session = Session::TouchPan(PanTrack::new(*touch));
                        out.push(GestureEvent::PanStart { origin: *touch });
                    }
                    _ => self.mouse_interaction = true,
                }
            }
            _ => {
                if remaining.is_empty() {
                    self.mouse_interaction = true;
                }
            }
        }
    }

    fn finish_pan(&mut self, track: PanTrack, out: &mut Gestures) {
        self.session = Session::Idle;
        out.push(GestureEvent::PanEnd {
            position: track.last,
            dx: track.dx,
            dy: track.dy,
            moved: self.pan_happened,
        });
    }
}
