//! State management module
//! 
//! This module contains the shared application state that owns the engine.

pub mod app_state;
pub mod error;

// Re-export main types
pub use app_state::{AppState, LiveEngine};
pub use error::StateError;
