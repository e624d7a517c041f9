//! The tutor: one user message in, one reply out.
//!
//! `TutorAgent` owns a `ConversationStore` and an injected `AiClient`.
//! Each `respond` call records the user turn, sends the session's history
//! to the provider once, and records the reply only if the call succeeded.

mod types;


pub use types::{TutorError, TutorSettings, DEFAULT_SYSTEM_PROMPT};

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::store::{ConversationStore, EssayStage, SessionInfo};
use crate::token_tracker::TokenTracker;
use crate::{AiClient, Message, Role, SessionId};

use types::BusyGuard;

pub struct TutorAgent {
    client: Arc<dyn AiClient>,
    store: ConversationStore,
    settings: TutorSettings,
    tracker: Mutex<TokenTracker>,
}

impl TutorAgent {
    pub fn new(client: Arc<dyn AiClient>, settings: TutorSettings) -> Self {
        Self {
            client,
            store: ConversationStore::new().with_system_prompt(settings.system_prompt.clone()),
            settings,
            tracker: Mutex::new(TokenTracker::new()),
        }
    }

    pub fn settings(&self) -> &TutorSettings {
        &self.settings
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Send `user_text` in session `session_id` and return the tutor's reply.
    ///
    /// The session is created (system-primed) on first use. If the
    /// provider call fails the user message stays in history and no
    /// assistant message is added, so resubmitting resends full context.
    pub async fn respond(
        &self,
        session_id: &SessionId,
        user_text: &str,
    ) -> Result<String, TutorError> {
        if user_text.trim().is_empty() {
            return Err(TutorError::EmptyMessage);
        }

        self.store.ensure_session(session_id);
        let _guard = BusyGuard::new(self.store.begin_request(session_id)?);

        self.store.append(session_id, Message::user(user_text))?;
        let request = windowed(self.store.history(session_id)?, self.settings.history_window);

        debug!(session = %session_id, messages = request.len(), "requesting tutor reply");

        let response = match self.client.send_message(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session = %session_id, error = %e, "tutor reply failed");
                return Err(TutorError::Completion(e));
            }
        };

        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(session_id, &response.usage);
        self.store
            .append(session_id, Message::assistant(response.content.clone()))?;

        Ok(response.content)
    }

    pub fn create_session(&self, session_id: &SessionId) -> Result<(), TutorError> {
        Ok(self.store.create_session(session_id)?)
    }

    pub fn history(&self, session_id: &SessionId) -> Result<Vec<Message>, TutorError> {
        Ok(self.store.history(session_id)?)
    }

    pub fn clear_session(&self, session_id: &SessionId) -> Result<(), TutorError> {
        Ok(self.store.clear(session_id)?)
    }

    /// Start the session over with only its system prime.
    pub fn reset_session(&self, session_id: &SessionId) -> Result<(), TutorError> {
        Ok(self.store.reset(session_id)?)
    }

    pub fn session_info(&self, session_id: &SessionId) -> Result<SessionInfo, TutorError> {
        Ok(self.store.info(session_id)?)
    }

    pub fn set_topic(&self, session_id: &SessionId, topic: &str) -> Result<(), TutorError> {
        Ok(self.store.set_topic(session_id, topic)?)
    }

    pub fn set_stage(&self, session_id: &SessionId, stage: EssayStage) -> Result<(), TutorError> {
        Ok(self.store.set_stage(session_id, stage)?)
    }

    /// Snapshot of token usage so far.
    pub fn usage(&self) -> TokenTracker {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Keep every system message plus the last `window` other messages.
fn windowed(history: Vec<Message>, window: Option<usize>) -> Vec<Message> {
    // A zero window would drop the turn being sent.
    let Some(window) = window.filter(|&n| n > 0) else {
        return history;
    };
    let turns = history.iter().filter(|m| m.role != Role::System).count();
    let mut skip = turns.saturating_sub(window);
    history
        .into_iter()
        .filter(|m| {
            if m.role == Role::System || skip == 0 {
                true
            } else {
                skip -= 1;
                false
            }
        })
        .collect()
}
