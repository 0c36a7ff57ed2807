//! Timer0 as the scheduler's deadline source
//!
//! Timer0 runs in normal mode and interrupts on overflow. The dispatcher
//! hands back the value to reload into TCNT0 so the next overflow lands on
//! the next task's slot.

use avr_device::atmega128a::{CPU, TC0};
use avr_device::interrupt;

use crate::config::TIMER0_PRESCALER;
use crate::rtos::InterruptGate;

const TOIE0: u8 = 1 << 0;
const CS_MASK: u8 = 0x07;
const SREG_I: u8 = 1 << 7;

pub struct Timer0 {
    tc0: TC0,
}

impl Timer0 {
    pub fn new(tc0: TC0) -> Self {
        // Normal mode, stopped
        tc0.tccr0.write(|w| unsafe { w.bits(0) });
        tc0.tcnt0.write(|w| unsafe { w.bits(0) });
        Self { tc0 }
    }

    pub fn start(&mut self) {
        self.tc0
            .tccr0
            .modify(|r, w| unsafe { w.bits((r.bits() & !CS_MASK) | (TIMER0_PRESCALER & CS_MASK)) });
    }

    pub fn enable_overflow_interrupt(&mut self) {
        self.tc0.timsk.modify(|r, w| unsafe { w.bits(r.bits() | TOIE0) });
    }

    /// Reload TCNT0. Called from the overflow handler, which does not own
    /// the peripheral.
    #[inline]
    pub fn write_counter(value: u8) {
        unsafe {
            (*TC0::ptr()).tcnt0.write(|w| w.bits(value));
        }
    }
}

/// Masks only the Timer0 overflow interrupt, leaving other sources live.
pub struct Timer0Interrupt;

impl InterruptGate for Timer0Interrupt {
    fn disable(&mut self) -> bool {
        unsafe {
            let tc0 = &*TC0::ptr();
            let was_enabled = tc0.timsk.read().bits() & TOIE0 != 0;
            tc0.timsk.modify(|r, w| w.bits(r.bits() & !TOIE0));
            was_enabled
        }
    }

    fn restore(&mut self, was_enabled: bool) {
        if was_enabled {
            unsafe {
                (*TC0::ptr()).timsk.modify(|r, w| w.bits(r.bits() | TOIE0));
            }
        }
    }
}

/// Global `cli`/`sei`, keyed off the SREG I bit.
pub struct GlobalInterrupts;

impl InterruptGate for GlobalInterrupts {
    fn disable(&mut self) -> bool {
        let was_enabled = unsafe { (*CPU::ptr()).sreg.read().bits() } & SREG_I != 0;
        interrupt::disable();
        was_enabled
    }

    fn restore(&mut self, was_enabled: bool) {
        if was_enabled {
            unsafe { interrupt::enable() };
        }
    }
}
