//! Agent settings, errors, and the per-session busy guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::store::StoreError;
use crate::{AiError, SessionId};

/// Persona used when the config does not override it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert essay writing tutor. Your role is to help students learn how to write \
effective essays through a structured, step-by-step approach.

Your teaching methodology:
1. Start by helping students choose a clear, focused topic
2. Guide them through brainstorming ideas and organizing thoughts
3. Help them create a structured outline
4. Assist with writing clear, coherent paragraphs
5. Provide feedback on revision and improvement

Key principles to emphasize:
- Clear thesis statements
- Logical organization and flow
- Strong topic sentences
- Supporting evidence and examples
- Proper transitions between ideas
- Conclusion that reinforces the main argument

Be encouraging, patient, and specific in your feedback. Ask clarifying questions when needed \
and provide concrete suggestions for improvement. Always maintain a supportive, educational tone.";

#[derive(Debug, Clone)]
pub struct TutorSettings {
    /// Primes every new session as its first `system` message.
    pub system_prompt: String,
    /// Most recent non-system messages sent per request; `None` or `Some(0)` sends all.
    pub history_window: Option<usize>,
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            history_window: None,
        }
    }
}

impl TutorSettings {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error(transparent)]
    Store(StoreError),
    #[error("completion failed: {0}")]
    Completion(#[from] AiError),
    #[error("session {0} is busy with another request")]
    SessionBusy(SessionId),
    #[error("message is empty")]
    EmptyMessage,
}

impl From<StoreError> for TutorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SessionBusy(id) => TutorError::SessionBusy(id),
            other => TutorError::Store(other),
        }
    }
}

/// Clears the session's busy flag on drop, so it is released on every
/// exit path including a dropped future.
pub(crate) struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    /// Wrap a flag already set by `ConversationStore::begin_request`.
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
