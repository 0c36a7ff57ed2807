use core::fmt;

/// Failures reported to the mutator context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Every registry slot is taken
    CapacityExceeded,
    /// The handle does not name a registered task
    UnknownTask,
    /// The frame-advance task cannot be rescheduled
    ReservedTask,
    /// A task builder was registered without a callback
    MissingCallback,
    /// Slot 127 is taken by the frame-advance task; a task there never runs
    ReservedSlot,
    TimeOutOfRange(u8),
    FrameMaskOutOfRange(u8),
    PeriodMaskOutOfRange(u8),
}

impl SchedulerError {
    fn describe(&self) -> &'static str {
        match self {
            Self::CapacityExceeded => "task registry full",
            Self::UnknownTask => "unknown task handle",
            Self::ReservedTask => "frame-advance task is reserved",
            Self::MissingCallback => "task has no callback",
            Self::ReservedSlot => "slot 127 belongs to the frame-advance task",
            Self::TimeOutOfRange(_) => "time slot above 127",
            Self::FrameMaskOutOfRange(_) => "frame mask wider than 5 bits",
            Self::PeriodMaskOutOfRange(_) => "period mask wider than 4 bits",
        }
    }

    fn value(&self) -> Option<u8> {
        match *self {
            Self::TimeOutOfRange(v)
            | Self::FrameMaskOutOfRange(v)
            | Self::PeriodMaskOutOfRange(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())?;
        if let Some(v) = self.value() {
            write!(f, " ({})", v)?;
        }
        Ok(())
    }
}

impl ufmt::uDisplay for SchedulerError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(self.describe())?;
        if let Some(v) = self.value() {
            ufmt::uwrite!(f, " ({})", v)?;
        }
        Ok(())
    }
}
