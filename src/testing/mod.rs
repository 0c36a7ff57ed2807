//! Host-side doubles for exercising the scheduler off target

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::rtos::InterruptGate;

/// Interrupt gate that only records what was asked of it
pub struct RecordingGate {
    enabled: bool,
    disables: u32,
    restores: u32,
}

impl RecordingGate {
    pub const fn new() -> Self {
        Self {
            enabled: true,
            disables: 0,
            restores: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn disables(&self) -> u32 {
        self.disables
    }

    pub fn restores(&self) -> u32 {
        self.restores
    }
}

impl Default for RecordingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptGate for RecordingGate {
    fn disable(&mut self) -> bool {
        self.disables += 1;
        let was = self.enabled;
        self.enabled = false;
        was
    }

    fn restore(&mut self, was_enabled: bool) {
        self.restores += 1;
        self.enabled = was_enabled;
    }
}

/// Fixed-size record of callback firings, shareable through `&`
pub struct CallLog<const N: usize> {
    tags: [AtomicU8; N],
    len: AtomicUsize,
}

impl<const N: usize> CallLog<N> {
    pub fn new() -> Self {
        Self {
            tags: core::array::from_fn(|_| AtomicU8::new(0)),
            len: AtomicUsize::new(0),
        }
    }

    /// Append `tag`; silently stops recording once full.
    pub fn push(&self, tag: u8) {
        let len = self.len.load(Ordering::Relaxed);
        if len < N {
            self.tags[len].store(tag, Ordering::Relaxed);
            self.len.store(len + 1, Ordering::Relaxed);
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, tag: u8) -> usize {
        self.iter().filter(|&t| t == tag).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.tags[..self.len()]
            .iter()
            .map(|t| t.load(Ordering::Relaxed))
    }

    pub fn clear(&self) {
        self.len.store(0, Ordering::Relaxed);
    }
}

impl<const N: usize> Default for CallLog<N> {
    fn default() -> Self {
        Self::new()
    }
}
