//! Six-digit HH:MM:SS input buffer

use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Number of keypad digits held by the buffer
pub const BUFFER_LEN: usize = 6;

/// Fixed-width shift register of decimal digits `[h, h, m, m, s, s]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputBuffer {
    digits: [u8; BUFFER_LEN],
}

impl InputBuffer {
    /// Create an all-zero buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from raw digits, rejecting any cell above 9
    pub fn from_digits(digits: [u8; BUFFER_LEN]) -> Option<Self> {
        digits.iter().all(|d| *d <= 9).then_some(Self { digits })
    }

    /// Build the buffer that displays `remaining_ms`.
    ///
    /// Seconds round up so a partial second never shows as zero. The carry
    /// propagates into minutes and hours. Hours past 99 wrap the tens digit.
    pub fn from_remaining(remaining_ms: u64) -> Self {
        let total_secs = remaining_ms.div_ceil(MS_PER_SECOND);
        let h = total_secs / 3600;
        let m = (total_secs / 60) % 60;
        let s = total_secs % 60;

        Self {
            digits: [
                ((h / 10) % 10) as u8,
                (h % 10) as u8,
                (m / 10) as u8,
                (m % 10) as u8,
                (s / 10) as u8,
                (s % 10) as u8,
            ],
        }
    }

    pub fn digits(&self) -> [u8; BUFFER_LEN] {
        self.digits
    }

    /// Shift left, dropping the oldest digit and appending `digit`
    pub(crate) fn push(&mut self, digit: u8) {
        self.digits.rotate_left(1);
        self.digits[BUFFER_LEN - 1] = digit;
    }

    /// Shift right, dropping the newest digit and inserting a leading zero
    pub(crate) fn pop(&mut self) {
        self.digits.rotate_right(1);
        self.digits[0] = 0;
    }

    pub(crate) fn clear(&mut self) {
        self.digits = [0; BUFFER_LEN];
    }

    pub fn hours(&self) -> u32 {
        self.pair(0)
    }

    pub fn minutes(&self) -> u32 {
        self.pair(2)
    }

    pub fn seconds(&self) -> u32 {
        self.pair(4)
    }

    /// Buffer total in milliseconds, reading the digits as HH:MM:SS
    pub fn total_ms(&self) -> u64 {
        u64::from(self.hours()) * MS_PER_HOUR
            + u64::from(self.minutes()) * MS_PER_MINUTE
            + u64::from(self.seconds()) * MS_PER_SECOND
    }

    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|d| *d == 0)
    }

    fn pair(&self, at: usize) -> u32 {
        u32::from(self.digits[at]) * 10 + u32::from(self.digits[at + 1])
    }
}

impl fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.digits;
        write!(f, "{}{}:{}{}:{}{}", d[0], d[1], d[2], d[3], d[4], d[5])
    }
}
