//! Frame/period interrupt scheduler

use crate::config::TASK_CAPACITY;

use super::critical::{self, InterruptGate};
use super::dispatcher::{DispatchStats, Dispatcher};
use super::error::SchedulerError;
use super::registry::{PublishSummary, Registry};
use super::schedule::{Frames, Periods, Schedule};
use super::task::{Callback, TaskHandle};

/// Owns both halves of the scheduler: the registry the application edits
/// and the dispatcher the timer interrupt drives. The halves only meet in
/// [`Scheduler::publish`].
pub struct Scheduler<'a, const N: usize = TASK_CAPACITY> {
    registry: Registry<'a, N>,
    dispatcher: Dispatcher<'a, N>,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    /// Fresh scheduler with only the frame-advance task registered.
    /// Nothing is dispatched until the first [`publish`](Self::publish).
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn register(
        &mut self,
        time: u8,
        frames: Frames,
        periods: Periods,
        callback: Callback<'a>,
    ) -> Result<TaskHandle, SchedulerError> {
        self.registry.register(time, frames, periods, callback)
    }

    pub fn set_time(&mut self, task: TaskHandle, time: u8) -> Result<(), SchedulerError> {
        self.registry.set_time(task, time)
    }

    pub fn set_frame_mask(&mut self, task: TaskHandle, frames: Frames) -> Result<(), SchedulerError> {
        self.registry.set_frame_mask(task, frames)
    }

    pub fn set_period_mask(&mut self, task: TaskHandle, periods: Periods) -> Result<(), SchedulerError> {
        self.registry.set_period_mask(task, periods)
    }

    pub fn schedule(&self, task: TaskHandle) -> Result<Schedule, SchedulerError> {
        self.registry.schedule(task)
    }

    /// Sort the staged tasks and swap them in as the active table.
    ///
    /// Only the swap runs inside the critical section. Registry edits made
    /// before this call become visible to the dispatcher all at once when
    /// it returns.
    pub fn publish<G: InterruptGate + ?Sized>(&mut self, gate: &mut G) -> PublishSummary {
        let table = self.registry.stage();
        let summary = PublishSummary::of(&table);
        let dispatcher = &mut self.dispatcher;
        critical::free(gate, || dispatcher.install(table));
        summary
    }

    /// Timer expiry entry point; see [`Dispatcher::on_timer_tick`].
    #[inline]
    pub fn on_timer_tick(&mut self, counter: &mut u8) {
        self.dispatcher.on_timer_tick(counter);
    }

    pub fn registry(&self) -> &Registry<'a, N> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<'a, N> {
        &mut self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher<'a, N> {
        &self.dispatcher
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    /// Split into halves for firmware that parks the dispatcher somewhere
    /// its interrupt handler can reach.
    pub fn into_parts(self) -> (Registry<'a, N>, Dispatcher<'a, N>) {
        (self.registry, self.dispatcher)
    }
}

impl<const N: usize> Default for Scheduler<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
