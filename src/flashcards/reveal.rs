//! Reveal-then-act sequencing for deferred actions
//!
//! A deferred action on an unflipped card first shows the answer and only
//! runs once the learner has had time to read it:
//!
//! ```text
//! Idle ──blurred──▶ Unblurring ──delay──▶ Revealing ──delay──▶ Executing ──▶ Idle
//!   └────plain──────────────────────────▶ Revealing ...
//! ```
//!
//! Nothing here sleeps. The host loop calls [`RevealMachine::tick`] with the
//! current time and acts on the event it gets back.

use std::time::{Duration, Instant};

use super::gestures::GestureAction;

/// Delay between reveal stages
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(2000);

/// A slot holding at most one scheduled task.
///
/// Every cancel bumps the slot's generation and tasks remember the
/// generation they were scheduled under, so a task that outlives a cancel
/// is never handed out.
#[derive(Debug)]
pub struct TaskSlot<T> {
    pending: Option<Scheduled<T>>,
    generation: u64,
}

#[derive(Debug)]
struct Scheduled<T> {
    due: Instant,
    generation: u64,
    task: T,
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<T> TaskSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Schedule `task` for `due`, replacing anything already pending
    pub fn schedule(&mut self, due: Instant, task: T) {
        self.pending = Some(Scheduled {
            due,
            generation: self.generation,
            task,
        });
    }

    /// Drop the pending task and invalidate the current generation
    pub fn cancel(&mut self) -> Option<T> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take().map(|s| s.task)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|s| s.due)
    }

    /// Take the task if its deadline has passed, along with that deadline
    pub fn take_due(&mut self, now: Instant) -> Option<(Instant, T)> {
        match &self.pending {
            Some(s) if s.generation != self.generation => {
                log::debug!("Dropping stale task from generation {}", s.generation);
                self.pending = None;
                None
            }
            Some(s) if s.due <= now => self.pending.take().map(|s| (s.due, s.task)),
            _ => None,
        }
    }
}

/// Actions that wait for the answer to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    Move(u8),
    SendToBack { reverse: bool, blur: bool },
}

impl DeferredAction {
    pub fn from_gesture(action: GestureAction) -> Option<Self> {
        match action {
            GestureAction::Move(n) => Some(DeferredAction::Move(n)),
            GestureAction::SendToBack { reverse, blur } => Some(DeferredAction::SendToBack { reverse, blur }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    /// Blur removed; the front is visible
    Unblurring,
    /// The back is visible
    Revealing,
    /// The deferred action is being applied
    Executing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Flip(DeferredAction),
    Execute(DeferredAction),
}

/// What the host should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// Turn the card to its back
    Flip,
    /// Apply the action, then call [`RevealMachine::finish`]
    Execute(DeferredAction),
}

#[derive(Debug)]
pub struct RevealMachine {
    phase: RevealPhase,
    slot: TaskSlot<Stage>,
    delay: Duration,
}

impl Default for RevealMachine {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}

impl RevealMachine {
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: RevealPhase::Idle,
            slot: TaskSlot::new(),
            delay,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// While locked, new deferred actions are suppressed
    pub fn is_locked(&self) -> bool {
        self.phase != RevealPhase::Idle
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Takes effect from the next scheduled stage
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.slot.due()
    }

    pub fn generation(&self) -> u64 {
        self.slot.generation()
    }

    /// Start from a blurred card. The caller has already removed the blur.
    pub fn begin_unblur(&mut self, action: DeferredAction, now: Instant) -> bool {
        if self.is_locked() {
            return false;
        }
        self.phase = RevealPhase::Unblurring;
        self.slot.schedule(now + self.delay, Stage::Flip(action));
        true
    }

    /// Start from a visible, unflipped card. The caller has already flipped it.
    pub fn begin_reveal(&mut self, action: DeferredAction, now: Instant) -> bool {
        if self.is_locked() {
            return false;
        }
        self.phase = RevealPhase::Revealing;
        self.slot.schedule(now + self.delay, Stage::Execute(action));
        true
    }

    /// Advance if the pending stage is due. Each call yields at most one event.
    pub fn tick(&mut self, now: Instant) -> Option<RevealEvent> {
        let (due, stage) = self.slot.take_due(now)?;
        match stage {
            Stage::Flip(action) => {
                self.phase = RevealPhase::Revealing;
                self.slot.schedule(due + self.delay, Stage::Execute(action));
                Some(RevealEvent::Flip)
            }
            Stage::Execute(action) => {
                self.phase = RevealPhase::Executing;
                Some(RevealEvent::Execute(action))
            }
        }
    }

    /// Release the lock once the action has been applied
    pub fn finish(&mut self) {
        self.phase = RevealPhase::Idle;
    }

    /// Abandon any sequence in progress; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        let had = self.slot.cancel().is_some() || self.phase != RevealPhase::Idle;
        self.phase = RevealPhase::Idle;
        had
    }
}
