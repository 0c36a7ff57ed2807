//! Packed schedule word
//!
//! ```text
//! 0000           00000        0000000
//! 12-15 period   7-11 frame   0-6 time
//! ```
//!
//! The raw `encode_*` functions do no range checking: a value wider than
//! its field spills into the neighbouring bits. Checked access goes
//! through [`crate::rtos::Registry`].

use bitflags::bitflags;

pub const FRAME_OFFSET: u16 = 7;
pub const PERIOD_OFFSET: u16 = 12;

pub const TIME_MASK: u16 = 0x007F;
pub const FRAME_MASK: u16 = 0x0F80;
pub const PERIOD_MASK: u16 = 0xF000;

pub const MAX_TIME_SLOT: u8 = 127;

pub const NUM_FRAMES: u8 = 5;
pub const NUM_PERIODS: u8 = 4;

bitflags! {
    /// Frames a task is eligible to run in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Frames: u8 {
        const F0 = 0b0_0001;
        const F1 = 0b0_0010;
        const F2 = 0b0_0100;
        const F3 = 0b0_1000;
        const F4 = 0b1_0000;
        const ALL = 0x1F;
    }
}

bitflags! {
    /// Periods a task is eligible to run in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Periods: u8 {
        const P0 = 0b0001;
        const P1 = 0b0010;
        const P2 = 0b0100;
        const P3 = 0b1000;
        const ALL = 0x0F;
    }
}

#[inline]
pub const fn encode_time(word: u16, time: u8) -> u16 {
    (word & !TIME_MASK) | time as u16
}

#[inline]
pub const fn encode_frame_mask(word: u16, frames: u8) -> u16 {
    (word & !FRAME_MASK) | ((frames as u16) << FRAME_OFFSET)
}

#[inline]
pub const fn encode_period_mask(word: u16, periods: u8) -> u16 {
    (word & !PERIOD_MASK) | ((periods as u16) << PERIOD_OFFSET)
}

#[inline]
pub const fn decode_time(word: u16) -> u8 {
    (word & TIME_MASK) as u8
}

#[inline]
pub const fn decode_frame_mask(word: u16) -> u8 {
    ((word & FRAME_MASK) >> FRAME_OFFSET) as u8
}

#[inline]
pub const fn decode_period_mask(word: u16) -> u8 {
    ((word & PERIOD_MASK) >> PERIOD_OFFSET) as u8
}

/// One task's time slot, frame mask and period mask in a single word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schedule(u16);

impl Schedule {
    pub const fn from_bits(word: u16) -> Self {
        Self(word)
    }

    pub fn new(time: u8, frames: Frames, periods: Periods) -> Self {
        Self(0)
            .with_time(time)
            .with_frames(frames)
            .with_periods(periods)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn with_time(self, time: u8) -> Self {
        Self(encode_time(self.0, time))
    }

    pub const fn with_frames(self, frames: Frames) -> Self {
        Self(encode_frame_mask(self.0, frames.bits()))
    }

    pub const fn with_periods(self, periods: Periods) -> Self {
        Self(encode_period_mask(self.0, periods.bits()))
    }

    pub const fn time(self) -> u8 {
        decode_time(self.0)
    }

    pub const fn frames(self) -> Frames {
        Frames::from_bits_retain(decode_frame_mask(self.0))
    }

    pub const fn periods(self) -> Periods {
        Periods::from_bits_retain(decode_period_mask(self.0))
    }

    /// True when both the frame bit and the period bit are set.
    #[inline]
    pub const fn is_due(self, frame: u8, period: u8) -> bool {
        let frame_bit = 1u16 << (frame as u16 + FRAME_OFFSET);
        let period_bit = 1u16 << (period as u16 + PERIOD_OFFSET);
        self.0 & frame_bit != 0 && self.0 & period_bit != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let word = Schedule::new(0x7F, Frames::empty(), Periods::empty()).bits();
        assert_eq!(word, TIME_MASK);
        let word = Schedule::new(0, Frames::ALL, Periods::empty()).bits();
        assert_eq!(word, FRAME_MASK);
        let word = Schedule::new(0, Frames::empty(), Periods::ALL).bits();
        assert_eq!(word, PERIOD_MASK);
    }

    #[test]
    fn test_time_roundtrip_keeps_other_fields() {
        let base = Schedule::new(0, Frames::F1 | Frames::F3, Periods::P2).bits();
        for t in 0..=MAX_TIME_SLOT {
            let word = encode_time(base, t);
            assert_eq!(decode_time(word), t);
            assert_eq!(decode_frame_mask(word), 0b01010);
            assert_eq!(decode_period_mask(word), 0b0100);
        }
    }

    #[test]
    fn test_mask_roundtrip_keeps_time() {
        let base = encode_time(0xFFFF, 42);
        for m in 0..=0x1F {
            let word = encode_frame_mask(base, m);
            assert_eq!(decode_frame_mask(word), m);
            assert_eq!(decode_time(word), 42);
            assert_eq!(decode_period_mask(word), 0x0F);
        }
        for m in 0..=0x0F {
            let word = encode_period_mask(base, m);
            assert_eq!(decode_period_mask(word), m);
            assert_eq!(decode_time(word), 42);
            assert_eq!(decode_frame_mask(word), 0x1F);
        }
    }

    #[test]
    fn test_wide_time_spills_into_frame_bits() {
        let word = encode_time(0, 0x80);
        assert_eq!(decode_time(word), 0);
        assert_eq!(decode_frame_mask(word), 0b00001);
    }

    #[test]
    fn test_is_due() {
        let s = Schedule::new(10, Frames::F0 | Frames::F4, Periods::P3);
        assert!(s.is_due(0, 3));
        assert!(s.is_due(4, 3));
        assert!(!s.is_due(1, 3));
        assert!(!s.is_due(0, 0));
    }
}
