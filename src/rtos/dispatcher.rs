//! Timer-interrupt side of the scheduler
//!
//! Each tick runs the task chosen on the previous tick, then looks ahead
//! for the next due task and reprograms the counter for it. Deciding and
//! firing are a tick apart so the counter is already reloaded by the time
//! a callback starts.

use crate::config::{COUNTER_TOP, TICK_SCALE};

use super::frame::FrameCursor;
use super::task::{Action, TaskRecord};

/// Published, time-sorted copy of the registry. Occupied slots are packed
/// from index 0; the first `None` ends the data.
pub type ActiveTable<'a, const N: usize> = [Option<TaskRecord<'a>>; N];

/// Wrapping counters kept by the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub ticks: u32,
    pub frames: u32,
    pub callbacks: u32,
}

pub struct Dispatcher<'a, const N: usize> {
    table: ActiveTable<'a, N>,
    cursor: FrameCursor,
    latched: Option<TaskRecord<'a>>,
    stats: DispatchStats,
}

impl<'a, const N: usize> Dispatcher<'a, N> {
    pub const fn new() -> Self {
        Self {
            table: [None; N],
            cursor: FrameCursor::new(),
            latched: None,
            stats: DispatchStats {
                ticks: 0,
                frames: 0,
                callbacks: 0,
            },
        }
    }

    /// Replace the whole active table. Must run with the dispatch
    /// interrupt masked; see [`crate::rtos::critical`].
    ///
    /// Frame, period and elapsed time carry over. Mid-frame, the scan
    /// resumes at the first entry strictly after the latched task's slot,
    /// so nothing at or before it runs twice in this frame and the next
    /// deadline never lies behind the counter.
    pub fn install(&mut self, table: ActiveTable<'a, N>) {
        self.table = table;
        if self.latched.is_some() {
            let elapsed = self.cursor.elapsed();
            let resume = self
                .table
                .iter()
                .position(|slot| slot.map_or(true, |task| task.time() * TICK_SCALE > elapsed))
                .unwrap_or(N);
            self.cursor.set_scan(resume);
        }
    }

    /// Timer expiry handler.
    ///
    /// `counter` is the 8-bit up-counter that raises the next interrupt on
    /// overflow. Time slots are stored at half resolution, so a slot `t`
    /// sits `2 * t` counter ticks into the frame.
    ///
    /// # Panics
    /// When no due task is left in the table. The frame-advance task
    /// matches every frame at the last slot, so this only happens if the
    /// table was never published or has been corrupted.
    pub fn on_timer_tick(&mut self, counter: &mut u8) {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);

        if let Some(task) = self.latched {
            self.fire(task.action);
        }

        let next = match self.next_due() {
            Some(task) => task,
            None => panic!(
                "no due task in frame {} period {}",
                self.cursor.frame(),
                self.cursor.period()
            ),
        };

        let ticks = next.time() * TICK_SCALE;
        // scanned entries are never behind `elapsed`, see `install`
        let delta = ticks.wrapping_sub(self.cursor.elapsed());
        *counter = COUNTER_TOP - delta;
        self.cursor.set_elapsed(ticks);

        self.latched = Some(next);
    }

    fn fire(&mut self, action: Action<'a>) {
        match action {
            Action::AdvanceFrame => {
                self.cursor.advance_frame();
                self.stats.frames = self.stats.frames.wrapping_add(1);
            }
            Action::Call(callback) => {
                callback();
                self.stats.callbacks = self.stats.callbacks.wrapping_add(1);
            }
        }
    }

    fn next_due(&mut self) -> Option<TaskRecord<'a>> {
        for index in self.cursor.scan()..N {
            let task = self.table[index]?;
            if self.cursor.is_due(task.schedule) {
                self.cursor.set_scan(index + 1);
                return Some(task);
            }
        }
        None
    }

    pub fn cursor(&self) -> &FrameCursor {
        &self.cursor
    }

    pub fn frame(&self) -> u8 {
        self.cursor.frame()
    }

    pub fn period(&self) -> u8 {
        self.cursor.period()
    }

    pub fn elapsed(&self) -> u8 {
        self.cursor.elapsed()
    }

    pub fn latched(&self) -> Option<&TaskRecord<'a>> {
        self.latched.as_ref()
    }

    pub fn active(&self) -> &ActiveTable<'a, N> {
        &self.table
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

impl<const N: usize> Default for Dispatcher<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
