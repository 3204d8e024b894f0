//! Countdown engine module
//! 
//! This module contains the keypad buffer, the derived display values and
//! the state machine that ties them to a running clock.

pub mod buffer;
pub mod countdown;
pub mod display;
pub mod error;
pub mod run_state;

// Re-export main types
pub use buffer::InputBuffer;
pub use countdown::{CountdownEngine, DEFAULT_TICK_INTERVAL};
pub use display::{sweep_angle, Snapshot, FULL_SWEEP};
pub use error::EngineError;
pub use run_state::RunState;
