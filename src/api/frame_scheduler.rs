use smallvec::SmallVec;

use crate::extensions::EventKind;
use crate::interaction::GestureEvent;
use crate::render::ClearScope;

/// Layers to clear and subscribers to draw on the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawRequest {
    pub scope: ClearScope,
    pub triggers: SmallVec<[EventKind; 2]>,
    pub force: bool,
}

impl RedrawRequest {
    #[must_use]
    pub fn new(scope: ClearScope, trigger: EventKind) -> Self {
        Self {
            scope,
            triggers: SmallVec::from_buf_and_len([trigger, trigger], 1),
            force: false,
        }
    }

    /// Clears everything and draws every subscriber.
    #[must_use]
    pub fn forced(scope: ClearScope, trigger: Option<EventKind>) -> Self {
        Self {
            scope,
            triggers: trigger.into_iter().collect(),
            force: true,
        }
    }

    pub fn merge(&mut self, other: RedrawRequest) {
        self.scope = self.scope.merge(other.scope);
        self.force |= other.force;
        for trigger in other.triggers {
            if !self.triggers.contains(&trigger) {
                self.triggers.push(trigger);
            }
        }
    }
}

/// Work waiting for the next animation frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingFrame {
    /// Latest move-class gesture; newer ones overwrite it.
    pub gesture: Option<GestureEvent>,
    pub redraw: Option<RedrawRequest>,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum FrameState {
    #[default]
    Idle,
    FrameScheduled(PendingFrame),
}

/// Single-slot frame scheduler.
///
/// At most one frame is outstanding; anything enqueued before it runs is
/// folded into the same slot.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    state: FrameState,
}

impl FrameScheduler {
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, FrameState::FrameScheduled(_))
    }

    /// Replaces the pending gesture. Returns `true` when a new frame must be
    /// requested from the host.
    pub fn schedule_gesture(&mut self, gesture: GestureEvent) -> bool {
        let requested = !self.is_scheduled();
        self.slot().gesture = Some(gesture);
        requested
    }

    /// Merges into the pending redraw. Returns `true` when a new frame must
    /// be requested from the host.
    pub fn schedule_redraw(&mut self, redraw: RedrawRequest) -> bool {
        let requested = !self.is_scheduled();
        let slot = self.slot();
        match &mut slot.redraw {
            Some(pending) => pending.merge(redraw),
            None => slot.redraw = Some(redraw),
        }
        requested
    }

    /// Removes the pending gesture without running the frame.
    pub fn take_gesture(&mut self) -> Option<GestureEvent> {
        match &mut self.state {
            FrameState::FrameScheduled(pending) => {
                let gesture = pending.gesture.take();
                if pending.redraw.is_none() {
                    self.state = FrameState::Idle;
                }
                gesture
            }
            FrameState::Idle => None,
        }
    }

    /// Empties the slot for the frame callback.
    pub fn drain(&mut self) -> Option<PendingFrame> {
        match std::mem::take(&mut self.state) {
            FrameState::FrameScheduled(pending) => Some(pending),
            FrameState::Idle => None,
        }
    }

    fn slot(&mut self) -> &mut PendingFrame {
        if let FrameState::Idle = self.state {
            self.state = FrameState::FrameScheduled(PendingFrame::default());
        }
        match &mut self.state {
            FrameState::FrameScheduled(pending) => pending,
            FrameState::Idle => unreachable!("slot was just scheduled"),
        }
    }
}
