//! Configuration constants for the frame scheduler firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Number of task slots in the registry, frame-advance task included
pub const TASK_CAPACITY: usize = 10;

/// Largest value the 8-bit deadline counter holds before it overflows.
/// Timer0 counts up from the programmed value and interrupts on the wrap
/// to zero, so writing `COUNTER_TOP - n` fires after `n + 1` counts.
pub const COUNTER_TOP: u8 = 255;

/// Time slots are registered in half-resolution units; the hardware
/// counter runs at full resolution.
pub const TICK_SCALE: u8 = 2;

/// Timer0 clock select bits (CS02:0 = 0b111, clk/1024)
pub const TIMER0_PRESCALER: u8 = 0x07;
