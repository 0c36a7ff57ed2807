//! Mutator-side task registry
//!
//! Records live in a fixed arena addressed by [`TaskHandle`]. The staging
//! sequence lists the registered handles and is only put in time order
//! when a table is staged for publishing, so handles stay valid across
//! publishes.

use super::dispatcher::ActiveTable;
use super::error::SchedulerError;
use super::schedule::{Frames, Periods, Schedule, MAX_TIME_SLOT};
use super::task::{Action, Callback, TaskHandle, TaskRecord};

/// Frame-advance task: every frame, every period, last slot.
pub const FRAME_ADVANCE_SLOT: u8 = MAX_TIME_SLOT;

/// What a publish put live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub tasks: u8,
    pub first_slot: u8,
    pub last_slot: u8,
}

impl PublishSummary {
    pub fn of<const N: usize>(table: &ActiveTable<'_, N>) -> Self {
        let mut summary = Self {
            tasks: 0,
            first_slot: MAX_TIME_SLOT,
            last_slot: 0,
        };
        for task in table.iter().map_while(Option::as_ref) {
            summary.tasks += 1;
            summary.first_slot = summary.first_slot.min(task.time());
            summary.last_slot = summary.last_slot.max(task.time());
        }
        summary
    }
}

pub struct Registry<'a, const N: usize> {
    records: [Option<TaskRecord<'a>>; N],
    staged: [Option<TaskHandle>; N],
    len: usize,
}

impl<'a, const N: usize> Registry<'a, N> {
    const CAPACITY_OK: () = assert!(N >= 1 && N <= u8::MAX as usize, "capacity must be 1..=255");

    /// Empty registry holding only the frame-advance task.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;

        let mut registry = Self {
            records: [None; N],
            staged: [None; N],
            len: 0,
        };
        let advance = TaskRecord::new(
            Schedule::new(FRAME_ADVANCE_SLOT, Frames::ALL, Periods::ALL),
            Action::AdvanceFrame,
        );
        registry.records[0] = Some(advance);
        registry.staged[0] = Some(TaskHandle::FRAME_ADVANCE);
        registry.len = 1;
        registry
    }

    /// Add a task at slot `time` (0..=126; 127 is the frame-advance
    /// task's). It goes live on the next publish.
    pub fn register(
        &mut self,
        time: u8,
        frames: Frames,
        periods: Periods,
        callback: Callback<'a>,
    ) -> Result<TaskHandle, SchedulerError> {
        let schedule = Schedule::new(
            check_time(time)?,
            check_frames(frames)?,
            check_periods(periods)?,
        );

        let slot = self
            .staged
            .iter()
            .position(Option::is_none)
            .ok_or(SchedulerError::CapacityExceeded)?;

        let handle = TaskHandle::new(self.len as u8);
        self.records[self.len] = Some(TaskRecord::new(schedule, Action::Call(callback)));
        self.staged[slot] = Some(handle);
        self.len += 1;
        Ok(handle)
    }

    pub fn set_time(&mut self, task: TaskHandle, time: u8) -> Result<(), SchedulerError> {
        let time = check_time(time)?;
        let record = self.record_mut(task)?;
        record.schedule = record.schedule.with_time(time);
        Ok(())
    }

    pub fn set_frame_mask(&mut self, task: TaskHandle, frames: Frames) -> Result<(), SchedulerError> {
        let frames = check_frames(frames)?;
        let record = self.record_mut(task)?;
        record.schedule = record.schedule.with_frames(frames);
        Ok(())
    }

    pub fn set_period_mask(&mut self, task: TaskHandle, periods: Periods) -> Result<(), SchedulerError> {
        let periods = check_periods(periods)?;
        let record = self.record_mut(task)?;
        record.schedule = record.schedule.with_periods(periods);
        Ok(())
    }

    pub fn schedule(&self, task: TaskHandle) -> Result<Schedule, SchedulerError> {
        self.records
            .get(task.index())
            .and_then(Option::as_ref)
            .map(|record| record.schedule)
            .ok_or(SchedulerError::UnknownTask)
    }

    /// Sort the staging sequence and copy it out as a table for the
    /// dispatcher.
    pub fn stage(&mut self) -> ActiveTable<'a, N> {
        self.sort();
        core::array::from_fn(|i| self.staged[i].and_then(|h| self.records[h.index()]))
    }

    /// Registered handles in staging order.
    pub fn staged(&self) -> impl Iterator<Item = TaskHandle> + '_ {
        self.staged.iter().map_while(|h| *h)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    fn record_mut(&mut self, task: TaskHandle) -> Result<&mut TaskRecord<'a>, SchedulerError> {
        if task == TaskHandle::FRAME_ADVANCE {
            return Err(SchedulerError::ReservedTask);
        }
        self.records
            .get_mut(task.index())
            .and_then(Option::as_mut)
            .ok_or(SchedulerError::UnknownTask)
    }

    fn time_of(&self, task: TaskHandle) -> u8 {
        self.records[task.index()].map_or(0, |record| record.time())
    }

    /// Stable insertion sort by time slot; the first empty slot ends the data.
    fn sort(&mut self) {
        for k in 1..N {
            let Some(key) = self.staged[k] else { break };
            let key_time = self.time_of(key);

            let mut i = k;
            while i > 0 {
                let Some(prev) = self.staged[i - 1] else { break };
                if key_time >= self.time_of(prev) {
                    break;
                }
                self.staged[i] = Some(prev);
                i -= 1;
            }
            self.staged[i] = Some(key);
        }
    }
}

impl<const N: usize> Default for Registry<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_time(time: u8) -> Result<u8, SchedulerError> {
    if time > MAX_TIME_SLOT {
        return Err(SchedulerError::TimeOutOfRange(time));
    }
    // the frame-advance task sorts ahead of it and resets the scan
    if time == FRAME_ADVANCE_SLOT {
        return Err(SchedulerError::ReservedSlot);
    }
    Ok(time)
}

fn check_frames(frames: Frames) -> Result<Frames, SchedulerError> {
    if !Frames::ALL.contains(frames) {
        return Err(SchedulerError::FrameMaskOutOfRange(frames.bits()));
    }
    Ok(frames)
}

fn check_periods(periods: Periods) -> Result<Periods, SchedulerError> {
    if !Periods::ALL.contains(periods) {
        return Err(SchedulerError::PeriodMaskOutOfRange(periods.bits()));
    }
    Ok(periods)
}

/// Chained task registration, defaulting to every frame and period.
pub struct TaskBuilder<'a> {
    time: u8,
    frames: Frames,
    periods: Periods,
    callback: Option<Callback<'a>>,
}

impl<'a> TaskBuilder<'a> {
    pub fn new() -> Self {
        Self {
            time: 0,
            frames: Frames::ALL,
            periods: Periods::ALL,
            callback: None,
        }
    }

    pub fn time(mut self, time: u8) -> Self {
        self.time = time;
        self
    }

    pub fn frames(mut self, frames: Frames) -> Self {
        self.frames = frames;
        self
    }

    pub fn periods(mut self, periods: Periods) -> Self {
        self.periods = periods;
        self
    }

    pub fn callback(mut self, callback: Callback<'a>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn register<const N: usize>(
        self,
        registry: &mut Registry<'a, N>,
    ) -> Result<TaskHandle, SchedulerError> {
        let callback = self.callback.ok_or(SchedulerError::MissingCallback)?;
        registry.register(self.time, self.frames, self.periods, callback)
    }
}

impl Default for TaskBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
