//! Countdown - A keypad-driven countdown timer engine
//! 
//! This library provides the countdown state machine, the clock and tick
//! sources that drive it, and an HTTP surface that forwards keypad gestures
//! and publishes the remaining time.

pub mod config;
pub mod engine;
pub mod scheduler;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CountdownEngine, EngineError, RunState, Snapshot};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
