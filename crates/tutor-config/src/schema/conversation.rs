//! Tutor persona and history settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConversationConfig {
    /// Overrides the built-in essay tutor persona.
    pub system_prompt: Option<String>,
    /// Number of most recent turns sent with each request. 0 sends everything.
    pub history_window: u32,
}

impl ConversationConfig {
    pub fn history_window(&self) -> Option<usize> {
        match self.history_window {
            0 => None,
            n => Some(n as usize),
        }
    }
}
