//! Line-oriented logging over any `ufmt` sink
//!
//! Meant for the mutator context only. Nothing here is safe to call from
//! the dispatch interrupt, which must stay short.

use embedded_hal::serial;
use ufmt::{uDisplay, uWrite, uwrite};

use crate::rtos::{PublishSummary, SchedulerError};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "[DBG] ",
            Level::Info => "[INF] ",
            Level::Warn => "[WRN] ",
            Level::Error => "[ERR] ",
        }
    }
}

pub struct Logger<W: uWrite> {
    out: W,
}

impl<W: uWrite> Logger<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn log<M: uDisplay + ?Sized>(&mut self, level: Level, msg: &M) -> Result<(), W::Error> {
        if level == Level::Debug && !cfg!(feature = "debug") {
            return Ok(());
        }
        self.out.write_str(level.tag())?;
        uwrite!(self.out, "{}", msg)?;
        self.out.write_str("\r\n")
    }

    pub fn debug<M: uDisplay + ?Sized>(&mut self, msg: &M) -> Result<(), W::Error> {
        self.log(Level::Debug, msg)
    }

    pub fn info<M: uDisplay + ?Sized>(&mut self, msg: &M) -> Result<(), W::Error> {
        self.log(Level::Info, msg)
    }

    pub fn warn<M: uDisplay + ?Sized>(&mut self, msg: &M) -> Result<(), W::Error> {
        self.log(Level::Warn, msg)
    }

    pub fn error<M: uDisplay + ?Sized>(&mut self, msg: &M) -> Result<(), W::Error> {
        self.log(Level::Error, msg)
    }

    pub fn log_publish(&mut self, summary: &PublishSummary) -> Result<(), W::Error> {
        self.out.write_str(Level::Info.tag())?;
        uwrite!(
            self.out,
            "published {} tasks, slots {}..{}\r\n",
            summary.tasks,
            summary.first_slot,
            summary.last_slot
        )
    }

    pub fn log_error(&mut self, err: &SchedulerError) -> Result<(), W::Error> {
        self.error(err)
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Adapts a blocking-capable serial port to `ufmt`.
pub struct SerialWriter<S> {
    port: S,
}

impl<S> SerialWriter<S> {
    pub fn new(port: S) -> Self {
        Self { port }
    }

    pub fn release(self) -> S {
        self.port
    }
}

impl<S: serial::Write<u8>> SerialWriter<S> {
    pub fn flush(&mut self) -> Result<(), S::Error> {
        nb::block!(self.port.flush())
    }
}

impl<S: serial::Write<u8>> uWrite for SerialWriter<S> {
    type Error = S::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            nb::block!(self.port.write(byte))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::serial::{Mock as SerialMock, Transaction as SerialTransaction};

    struct Capture(String);

    impl uWrite for Capture {
        type Error = core::convert::Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn test_levels_prefix_lines() {
        let mut logger = Logger::new(Capture(String::new()));
        logger.info("scheduler up").unwrap();
        logger.warn("slow callback").unwrap();
        assert_eq!(
            logger.into_inner().0,
            "[INF] scheduler up\r\n[WRN] slow callback\r\n"
        );
    }

    #[test]
    fn test_debug_follows_feature() {
        let mut logger = Logger::new(Capture(String::new()));
        logger.debug("tick").unwrap();
        let out = logger.into_inner().0;
        if cfg!(feature = "debug") {
            assert_eq!(out, "[DBG] tick\r\n");
        } else {
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_log_publish_and_error() {
        let mut logger = Logger::new(Capture(String::new()));
        logger
            .log_publish(&PublishSummary {
                tasks: 4,
                first_slot: 10,
                last_slot: 127,
            })
            .unwrap();
        logger.log_error(&SchedulerError::CapacityExceeded).unwrap();
        assert_eq!(
            logger.into_inner().0,
            "[INF] published 4 tasks, slots 10..127\r\n[ERR] task registry full\r\n"
        );
    }

    #[test]
    fn test_serial_writer_blocks_per_byte() {
        let expectations = [
            SerialTransaction::write_many(b"[INF] ok\r\n"),
            SerialTransaction::flush(),
        ];
        let serial = SerialMock::new(&expectations);
        let mut logger = Logger::new(SerialWriter::new(serial));
        logger.info("ok").unwrap();
        logger.writer().flush().unwrap();
        let mut serial = logger.into_inner().release();
        serial.done();
    }
}
