//! ATmega128 peripherals behind the scheduler; AVR targets only

#[cfg(target_arch = "avr")]
pub mod timer;

#[cfg(target_arch = "avr")]
pub use timer::{GlobalInterrupts, Timer0, Timer0Interrupt};

#[cfg(target_arch = "avr")]
pub mod uart;

#[cfg(target_arch = "avr")]
pub use uart::Uart;
