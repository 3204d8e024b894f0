//! Derived display values published by the engine

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{InputBuffer, RunState};

/// Full sweep of the progress ring in degrees
pub const FULL_SWEEP: f64 = 360.0;

/// Sweep angle for `remaining_ms` out of `total_ms`, clamped to `[0, 360]`
pub fn sweep_angle(remaining_ms: u64, total_ms: u64) -> f64 {
    if total_ms == 0 {
        return 0.0;
    }
    (FULL_SWEEP * remaining_ms as f64 / total_ms as f64).clamp(0.0, FULL_SWEEP)
}

/// Values observed by the UI layer, republished on every recompute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Sweep angle in degrees
    pub angle: f64,
    pub state: RunState,
    pub editable: bool,
}

impl Snapshot {
    pub fn new(buffer: &InputBuffer, angle: f64, state: RunState) -> Self {
        Self {
            hours: buffer.hours(),
            minutes: buffer.minutes(),
            seconds: buffer.seconds(),
            angle,
            state,
            editable: state.is_editable(),
        }
    }

    /// Snapshot of a running countdown. Hours come straight from the
    /// remaining time so values past 99 are not truncated.
    pub fn for_remaining(remaining_ms: u64, total_ms: u64, state: RunState) -> Self {
        let buffer = InputBuffer::from_remaining(remaining_ms);
        let hours = (remaining_ms.div_ceil(1_000) / 3600) as u32;
        Self {
            hours,
            ..Self::new(&buffer, sweep_angle(remaining_ms, total_ms), state)
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(&InputBuffer::new(), 0.0, RunState::Stopped)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
