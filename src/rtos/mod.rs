//! Frame/period scheduled-interrupt engine

pub mod critical;
pub mod dispatcher;
pub mod error;
pub mod frame;
pub mod registry;
pub mod schedule;
pub mod scheduler;
pub mod task;

pub use critical::{CriticalSection, InterruptGate};
pub use dispatcher::{ActiveTable, DispatchStats, Dispatcher};
pub use error::SchedulerError;
pub use frame::FrameCursor;
pub use registry::{PublishSummary, Registry, TaskBuilder};
pub use schedule::{Frames, Periods, Schedule};
pub use scheduler::Scheduler;
pub use task::{Action, Callback, TaskHandle, TaskRecord};
