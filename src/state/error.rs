//! Application state errors

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Lock(String),
}
