use core::fmt;

use super::schedule::Schedule;

/// Application work run from the timer interrupt. Keep it short: nothing
/// stops a callback from overrunning the next deadline. `Sync` because the
/// dispatcher holding it is shared with the interrupt handler.
pub type Callback<'a> = &'a (dyn Fn() + Sync);

/// What a task does when it fires
#[derive(Clone, Copy)]
pub enum Action<'a> {
    /// Reserved frame-advance step, handled by the dispatcher itself
    AdvanceFrame,
    Call(Callback<'a>),
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AdvanceFrame => f.write_str("AdvanceFrame"),
            Action::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Stable reference to a registry slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(u8);

impl TaskHandle {
    /// Slot of the always-present frame-advance task
    pub const FRAME_ADVANCE: TaskHandle = TaskHandle(0);

    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A schedule word and the action it triggers
#[derive(Debug, Clone, Copy)]
pub struct TaskRecord<'a> {
    pub schedule: Schedule,
    pub action: Action<'a>,
}

impl<'a> TaskRecord<'a> {
    pub const fn new(schedule: Schedule, action: Action<'a>) -> Self {
        Self { schedule, action }
    }

    #[inline]
    pub const fn time(&self) -> u8 {
        self.schedule.time()
    }

    pub const fn is_frame_advance(&self) -> bool {
        matches!(self.action, Action::AdvanceFrame)
    }
}
