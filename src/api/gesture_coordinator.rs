use tracing::{debug, trace};

use crate::core::{FilterHints, LinearScale, Point, YPan};
use crate::error::ChartResult;
use crate::extensions::EventKind;
use crate::interaction::{GestureEvent, InputEvent, ZoomDirection};
use crate::render::{ClearScope, Surface};

use super::gesture_reducers::{load_more_range, pan_domain, pinch_domain, zoom_domain};
use super::viewport_controller::GestureSession;
use super::zoom_anchor::resolve_zoom_anchor;
use super::ViewportController;

impl<T: Sync, S: Surface> ViewportController<T, S> {
    /// Feeds one raw host event through the dispatcher.
    ///
    /// Move-class gestures are parked until the next animation frame; discrete
    /// gestures run immediately after flushing any parked move.
    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> ChartResult<()> {
        let conditions = self.pan_conditions();
        let gestures = self.dispatcher.handle(event, conditions, now_ms);
        for gesture in gestures {
            self.apply_gesture(gesture)?;
        }
        Ok(())
    }

    /// Fires expired click and wheel-pan timers.
    pub fn advance_time(&mut self, now_ms: f64) -> ChartResult<()> {
        let gestures = self.dispatcher.advance_time(now_ms);
        for gesture in gestures {
            self.apply_gesture(gesture)?;
        }
        Ok(())
    }

    /// Deadline the host should call [`Self::advance_time`] at.
    #[must_use]
    pub fn next_timer_deadline_ms(&self) -> Option<f64> {
        self.dispatcher.next_deadline_ms()
    }

    #[must_use]
    pub fn needs_animation_frame(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Runs the parked gesture, then the merged redraw.
    pub fn on_animation_frame(&mut self) -> ChartResult<()> {
        if let Some(gesture) = self.scheduler.take_gesture() {
            self.process_gesture(gesture)?;
        }
        let Some(frame) = self.scheduler.drain() else {
            return Ok(());
        };
        match frame.redraw {
            Some(redraw) => self.run_redraw(redraw),
            None => Ok(()),
        }
    }

    /// Routes one semantic gesture, coalescing moves per frame.
    pub fn apply_gesture(&mut self, gesture: GestureEvent) -> ChartResult<()> {
        if gesture.is_move_class() {
            if self.scheduler.schedule_gesture(gesture) {
                trace!(gesture = ?gesture, "animation frame requested");
            }
            return Ok(());
        }
        if let Some(pending) = self.scheduler.take_gesture() {
            let superseded = matches!(
                (&gesture, &pending),
                (GestureEvent::PanEnd { .. }, GestureEvent::Pan { .. })
            );
            if superseded {
                trace!("pending pan tick folded into pan end");
            } else {
                self.process_gesture(pending)?;
            }
        }
        self.process_gesture(gesture)
    }

    fn process_gesture(&mut self, gesture: GestureEvent) -> ChartResult<()> {
        match gesture {
            GestureEvent::MouseEnter => {
                self.pointer.show = true;
                self.broadcast(EventKind::MouseEnter)
            }
            GestureEvent::MouseLeave => {
                self.pointer.show = false;
                self.pointer_event(None, EventKind::MouseLeave)
            }
            GestureEvent::MouseMove { position, .. } => {
                self.pointer.show = true;
                self.pointer_event(Some(position), EventKind::MouseMove)
            }
            GestureEvent::MouseDown { position } => {
                self.pointer_event(Some(position), EventKind::MouseDown)
            }
            GestureEvent::Click { position } => self.pointer_event(Some(position), EventKind::Click),
            GestureEvent::DoubleClick { position } => {
                self.pointer_event(Some(position), EventKind::DoubleClick)
            }
            GestureEvent::ContextMenu { position } => {
                if self.drag_in_progress() {
                    self.gesture = None;
                    self.pointer.start_pos = None;
                    self.pointer_event(Some(position), EventKind::DragCancel)?;
                }
                self.pointer_event(Some(position), EventKind::ContextMenu)
            }
            GestureEvent::Zoom {
                direction,
                position,
            } => self.zoom(direction, position),
            GestureEvent::PanStart { origin } => self.pan_start(origin),
            GestureEvent::Pan { position, dx, dy } => self.pan(position, dx, dy),
            GestureEvent::PanEnd {
                position,
                dx,
                dy,
                moved,
            } => self.pan_end(position, dx, dy, moved),
            GestureEvent::DragStart { start } => {
                self.gesture = Some(GestureSession::Drag);
                self.pointer.start_pos = Some(start);
                self.pointer_event(Some(start), EventKind::DragStart)
            }
            GestureEvent::Drag { start, position } => {
                self.pointer.start_pos = Some(start);
                self.pointer_event(Some(position), EventKind::Drag)
            }
            GestureEvent::DragEnd { position } => {
                if !self.drag_in_progress() {
                    return Ok(());
                }
                self.gesture = None;
                self.pointer_event(Some(position), EventKind::DragEnd)?;
                self.pointer.start_pos = None;
                self.apply_pending()
            }
            GestureEvent::PinchStart { touch1, touch2 } => self.pinch_start(touch1, touch2),
            GestureEvent::PinchZoom { touch1, touch2 } => self.pinch(touch1, touch2),
            GestureEvent::PinchZoomEnd => self.pinch_end(),
        }
    }

    /// Hover-class event: pointer bookkeeping, broadcast, mouse layer redraw.
    fn pointer_event(&mut self, position: Option<Point>, kind: EventKind) -> ChartResult<()> {
        if let Some(position) = position {
            self.update_pointer(position);
        }
        self.broadcast(kind)?;
        self.request_redraw(ClearScope::Hover, kind);
        Ok(())
    }

    /// Committed x scale when it can drive pan and zoom.
    fn interactive_scale(&self, operation: &'static str) -> ChartResult<Option<LinearScale>> {
        match self.committed.linear_x_scale(operation) {
            Ok(scale) => Ok(Some(scale)),
            Err(err) => {
                self.inputs().check(Err(err))?;
                Ok(None)
            }
        }
    }

    fn zoom(&mut self, direction: ZoomDirection, position: Point) -> ChartResult<()> {
        if self.pan_in_progress() {
            trace!("zoom ignored while a pan is in progress");
            return Ok(());
        }
        let Some(scale) = self.interactive_scale("zoom")? else {
            return Ok(());
        };
        let Some(anchor) =
            resolve_zoom_anchor(self.config.zoom_anchor, &self.committed, &self.input, position)
        else {
            return Ok(());
        };
        let factor = direction.factor(self.config.zoom_multiplier);
        let domain = zoom_domain(scale, anchor, factor)?;
        let hints = FilterHints::with_current(self.committed.window.clone());
        let view = self
            .inputs()
            .for_domain(&self.committed, scale, domain, &hints, None)?;
        self.pointer.mouse_xy = Some(position);
        self.commit(view, Some(EventKind::Zoom))?;
        self.notify_load_more();
        Ok(())
    }

    fn pan_start(&mut self, origin: Point) -> ChartResult<()> {
        let Some(start_scale) = self.interactive_scale("pan")? else {
            return Ok(());
        };
        self.update_pointer(origin);
        self.gesture = Some(GestureSession::Pan {
            start_scale,
            charts: self.pointer.current_charts.clone(),
        });
        trace!(origin = ?origin, "pan started");
        Ok(())
    }

    fn pan(&mut self, position: Point, dx: f64, dy: f64) -> ChartResult<()> {
        let Some(GestureSession::Pan {
            start_scale,
            charts,
        }) = &self.gesture
        else {
            return Ok(());
        };
        let hints = FilterHints::with_current(self.displayed().window.clone());
        let domain = pan_domain(*start_scale, dx)?;
        let y_pan = YPan {
            dy,
            charts: Some(charts.as_slice()),
        };
        let view = self
            .inputs()
            .for_domain(&self.committed, *start_scale, domain, &hints, Some(y_pan))?;
        self.transient = Some(view);
        self.pointer.show = true;
        self.update_pointer(position);
        self.broadcast(EventKind::Pan)?;
        self.request_redraw(ClearScope::Cursor, EventKind::Pan);
        Ok(())
    }

    fn pan_end(&mut self, position: Point, dx: f64, dy: f64, moved: bool) -> ChartResult<()> {
        let Some(GestureSession::Pan {
            start_scale,
            charts,
        }) = self.gesture.take()
        else {
            return Ok(());
        };
        if moved {
            let hints = FilterHints::with_current(self.displayed().window.clone());
            let domain = pan_domain(start_scale, dx)?;
            let y_pan = YPan {
                dy,
                charts: Some(charts.as_slice()),
            };
            let view = self
                .inputs()
                .for_domain(&self.committed, start_scale, domain, &hints, Some(y_pan))?;
            self.pointer.mouse_xy = Some(position);
            self.commit(view, Some(EventKind::PanEnd))?;
            self.notify_load_more();
        } else {
            self.transient = None;
        }
        trace!(moved, dx, dy, "pan ended");
        self.apply_pending()
    }

    fn pinch_start(&mut self, touch1: Point, touch2: Point) -> ChartResult<()> {
        let Some(start_scale) = self.interactive_scale("pinch zoom")? else {
            return Ok(());
        };
        self.transient = None;
        self.gesture = Some(GestureSession::Pinch {
            start_scale,
            initial: (touch1, touch2),
        });
        Ok(())
    }

    fn pinch(&mut self, touch1: Point, touch2: Point) -> ChartResult<()> {
        let Some(GestureSession::Pinch {
            start_scale,
            initial,
        }) = &self.gesture
        else {
            return Ok(());
        };
        let start_scale = *start_scale;
        let Some(domain) = pinch_domain(start_scale, *initial, (touch1, touch2))? else {
            trace!("degenerate pinch ignored");
            return Ok(());
        };
        let hints = FilterHints::with_current(self.committed.window.clone());
        let view = self
            .inputs()
            .for_domain(&self.committed, start_scale, domain, &hints, None)?;
        self.transient = Some(view);
        self.refresh_pointer();
        self.broadcast(EventKind::PinchZoom)?;
        self.request_redraw(ClearScope::Cursor, EventKind::PinchZoom);
        Ok(())
    }

    fn pinch_end(&mut self) -> ChartResult<()> {
        if !matches!(self.gesture, Some(GestureSession::Pinch { .. })) {
            return Ok(());
        }
        self.gesture = None;
        if let Some(view) = self.transient.take() {
            self.commit(view, Some(EventKind::PinchZoomEnd))?;
            self.notify_load_more();
        }
        self.apply_pending()
    }

    /// Asks the host for older data when the committed domain starts before
    /// the first item.
    pub(super) fn notify_load_more(&mut self) {
        let Some(first) = self.input.data.first() else {
            return;
        };
        let first_x = self.input.x_accessor.get(first);
        let Some((start, end)) = load_more_range(self.committed.window.domain.0, first_x) else {
            return;
        };
        debug!(start, end, "load more requested");
        if let Some(handler) = self.load_more.as_mut() {
            handler(start, end);
        }
    }
}
