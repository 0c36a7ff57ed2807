//! Frame/period position of the dispatcher
//!
//! Five frames make a period and four periods make the full cycle, so the
//! cursor walks through 20 states and wraps back to `(0, 0)`. Only the
//! frame-advance task moves it.

use super::schedule::{Schedule, NUM_FRAMES, NUM_PERIODS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCursor {
    frame: u8,
    period: u8,
    /// Next active-table index to test
    scan: usize,
    /// Counter ticks consumed so far in this frame
    elapsed: u8,
}

impl FrameCursor {
    pub const fn new() -> Self {
        Self {
            frame: 0,
            period: 0,
            scan: 0,
            elapsed: 0,
        }
    }

    #[inline]
    pub fn frame(&self) -> u8 {
        self.frame
    }

    #[inline]
    pub fn period(&self) -> u8 {
        self.period
    }

    #[inline]
    pub fn scan(&self) -> usize {
        self.scan
    }

    #[inline]
    pub fn elapsed(&self) -> u8 {
        self.elapsed
    }

    /// Move to the next frame, rolling into the next period after frame 4,
    /// and restart the scan from the top of the table.
    pub fn advance_frame(&mut self) {
        if self.frame < NUM_FRAMES - 1 {
            self.frame += 1;
        } else {
            self.frame = 0;
            self.period = if self.period < NUM_PERIODS - 1 {
                self.period + 1
            } else {
                0
            };
        }
        self.scan = 0;
        self.elapsed = 0;
    }

    #[inline]
    pub fn is_due(&self, schedule: Schedule) -> bool {
        schedule.is_due(self.frame, self.period)
    }

    pub(crate) fn set_scan(&mut self, scan: usize) {
        self.scan = scan;
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: u8) {
        self.elapsed = elapsed;
    }
}
