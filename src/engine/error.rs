//! Engine error types

use thiserror::Error;

/// The only reportable engine failure; every other irregular call is a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid keypad digit {digit}, expected 0..=9")]
    InvalidArgument { digit: i32 },
}
