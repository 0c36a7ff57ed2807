//! Polled USART0 transmitter for log output

use avr_device::atmega128a::USART0;
use core::convert::Infallible;
use embedded_hal::serial;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

const UDRE0: u8 = 1 << 5;
const TXC0: u8 = 1 << 6;
const TXEN0: u8 = 1 << 3;
// 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0x06;

pub struct Uart {
    usart: USART0,
    /// A byte went out since the last completed flush
    pending: bool,
}

impl Uart {
    pub fn new(usart: USART0) -> Self {
        usart.ubrr0h.write(|w| unsafe { w.bits((UBRR >> 8) as u8) });
        usart.ubrr0l.write(|w| unsafe { w.bits(UBRR as u8) });
        usart.ucsr0c.write(|w| unsafe { w.bits(UCSZ_8N1) });
        usart.ucsr0b.write(|w| unsafe { w.bits(TXEN0) });
        Self {
            usart,
            pending: false,
        }
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        // TXC0 is cleared by writing a one to it
        self.usart.ucsr0a.modify(|r, w| unsafe { w.bits(r.bits() | TXC0) });
        self.usart.udr0.write(|w| unsafe { w.bits(byte) });
        self.pending = true;
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.pending && self.usart.ucsr0a.read().bits() & TXC0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        self.pending = false;
        Ok(())
    }
}
