//! Coarse run-state of the countdown

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Started,
    Paused,
    Finished,
}

impl RunState {
    /// Keypad edits are accepted in every state except `Started`
    pub fn is_editable(self) -> bool {
        self != RunState::Started
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Stopped => "stopped",
            RunState::Started => "started",
            RunState::Paused => "paused",
            RunState::Finished => "finished",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
