//! Error bookkeeping for the scheduler's mutator side

use ufmt::{uWrite, uwrite};

use crate::logger::Logger;
use crate::rtos::{DispatchStats, SchedulerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    CapacityError = 0x1000,
    HandleError = 0x2000,
    RangeError = 0x3000,
}

impl From<&SchedulerError> for ErrorCode {
    fn from(err: &SchedulerError) -> Self {
        match err {
            SchedulerError::CapacityExceeded => ErrorCode::CapacityError,
            SchedulerError::UnknownTask
            | SchedulerError::ReservedTask
            | SchedulerError::MissingCallback => ErrorCode::HandleError,
            SchedulerError::ReservedSlot
            | SchedulerError::TimeOutOfRange(_)
            | SchedulerError::FrameMaskOutOfRange(_)
            | SchedulerError::PeriodMaskOutOfRange(_) => ErrorCode::RangeError,
        }
    }
}

pub struct Diagnostics<W: uWrite> {
    logger: Logger<W>,
    last_error: Option<SchedulerError>,
    error_count: u32,
}

impl<W: uWrite> Diagnostics<W> {
    pub fn new(logger: Logger<W>) -> Self {
        Self {
            logger,
            last_error: None,
            error_count: 0,
        }
    }

    /// Record and log a rejected scheduler operation. Logging failures are
    /// dropped; the error is still counted.
    pub fn report(&mut self, err: SchedulerError) {
        self.last_error = Some(err);
        self.error_count = self.error_count.wrapping_add(1);
        self.logger.log_error(&err).ok();
    }

    /// Pass `result` through, reporting it on the way if it failed.
    pub fn check<T>(&mut self, result: Result<T, SchedulerError>) -> Result<T, SchedulerError> {
        if let Err(err) = result {
            self.report(err);
        }
        result
    }

    pub fn last_error(&self) -> Option<SchedulerError> {
        self.last_error
    }

    pub fn last_code(&self) -> Option<ErrorCode> {
        self.last_error.as_ref().map(ErrorCode::from)
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn log_stats(&mut self, stats: &DispatchStats) -> Result<(), W::Error> {
        let out = self.logger.writer();
        out.write_str("[INF] ")?;
        uwrite!(
            out,
            "ticks {} frames {} callbacks {}\r\n",
            stats.ticks,
            stats.frames,
            stats.callbacks
        )
    }

    pub fn logger(&mut self) -> &mut Logger<W> {
        &mut self.logger
    }
}
