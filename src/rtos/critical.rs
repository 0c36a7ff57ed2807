//! Scoped critical section over the dispatch interrupt source
//!
//! Publishing is the only point where the mutator context touches state
//! the dispatcher reads. It happens with the dispatch trigger masked, and
//! the mask is lifted when the guard drops, whichever way the scope exits.

/// Something that can hold off the dispatcher's interrupt
pub trait InterruptGate {
    /// Mask the interrupt, returning whether it was enabled before.
    fn disable(&mut self) -> bool;

    /// Put the interrupt back the way `disable` found it.
    fn restore(&mut self, was_enabled: bool);
}

/// RAII guard; the interrupt stays masked for the guard's lifetime
pub struct CriticalSection<'g, G: InterruptGate + ?Sized> {
    gate: &'g mut G,
    was_enabled: bool,
}

impl<'g, G: InterruptGate + ?Sized> CriticalSection<'g, G> {
    pub fn enter(gate: &'g mut G) -> Self {
        let was_enabled = gate.disable();
        Self { gate, was_enabled }
    }
}

impl<G: InterruptGate + ?Sized> Drop for CriticalSection<'_, G> {
    fn drop(&mut self) {
        self.gate.restore(self.was_enabled);
    }
}

/// Run `f` with the dispatch interrupt masked.
#[inline]
pub fn free<G, F, R>(gate: &mut G, f: F) -> R
where
    G: InterruptGate + ?Sized,
    F: FnOnce() -> R,
{
    let _cs = CriticalSection::enter(gate);
    f()
}
