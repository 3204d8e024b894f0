//! Time sources consumed by the engine
//! 
//! This module contains the clock and periodic scheduler interfaces along
//! with their tokio-backed and manually driven implementations.

pub mod clock;
pub mod manual;
pub mod periodic;
pub mod tokio_scheduler;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use manual::ManualScheduler;
pub use periodic::{PeriodicScheduler, Subscription};
pub use tokio_scheduler::TokioScheduler;
