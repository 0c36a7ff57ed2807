//! Frame/period scheduled-interrupt engine for the ATmega128
//!
//! One 8-bit timer is multiplexed across a small, fixed set of callbacks.
//! Each task carries a 7-bit time slot within a frame plus masks naming
//! the frames (of 5) and periods (of 4) it runs in. The application edits
//! a staging registry and publishes it; the timer interrupt only ever
//! reads the published copy.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod diagnostics;
pub mod hal;
pub mod logger;
pub mod rtos;
#[cfg(not(target_arch = "avr"))]
pub mod testing;

pub use rtos::{
    Frames, InterruptGate, Periods, PublishSummary, Registry, Schedule, Scheduler,
    SchedulerError, TaskBuilder, TaskHandle,
};

/// Scheduler sized from [`config::TASK_CAPACITY`]
pub type DefaultScheduler<'a> = Scheduler<'a, { config::TASK_CAPACITY }>;
