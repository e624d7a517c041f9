//! Session-scoped conversation history.
//!
//! `ConversationStore` maps a `SessionId` to an append-only list of
//! messages. It is the only thing that mutates history; everything else
//! (the agent, front-ends) goes through its methods and gets back owned
//! snapshots.

mod session;


pub use session::{EssayStage, SessionInfo};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::{Message, SessionId};

use session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
    #[error("session already exists: {0}")]
    DuplicateSession(SessionId),
    #[error("session {0} is busy with another request")]
    SessionBusy(SessionId),
}

/// Owns every session's message history.
///
/// A single lock guards the whole map; it is never held across I/O.
#[derive(Default)]
pub struct ConversationStore {
    sessions: Mutex<HashMap<SessionId, SessionState>>,
    /// When set, every new session starts with this as a `system` message.
    system_prompt: Option<String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionState>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new session. Creating one that already exists is an error;
    /// the existing history is left untouched.
    pub fn create_session(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        if sessions.contains_key(id) {
            return Err(StoreError::DuplicateSession(id.clone()));
        }
        sessions.insert(id.clone(), SessionState::new(self.system_prompt()));
        info!(session = %id, "session created");
        Ok(())
    }

    /// Create the session if it is missing. Returns `true` if it was created.
    pub fn ensure_session(&self, id: &SessionId) -> bool {
        let mut sessions = self.lock();
        if sessions.contains_key(id) {
            return false;
        }
        sessions.insert(id.clone(), SessionState::new(self.system_prompt()));
        info!(session = %id, "session created");
        true
    }

    pub fn append(&self, id: &SessionId, message: Message) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSession(id.clone()))?;
        debug!(session = %id, role = %message.role, "message appended");
        session.messages.push(message);
        Ok(())
    }

    /// Copy of the full ordered history.
    pub fn history(&self, id: &SessionId) -> Result<Vec<Message>, StoreError> {
        self.lock()
            .get(id)
            .map(|s| s.messages.clone())
            .ok_or_else(|| StoreError::UnknownSession(id.clone()))
    }

    /// Remove the session entirely. Refused while a request is in flight.
    pub fn clear(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        idle_session(&mut sessions, id)?;
        sessions.remove(id);
        info!(session = %id, "session cleared");
        Ok(())
    }

    /// Replace an existing session with a fresh one (topic, stage and
    /// history all reset). Refused while a request is in flight.
    pub fn reset(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let session = idle_session(&mut sessions, id)?;
        *session = SessionState::new(self.system_prompt.as_deref());
        info!(session = %id, "session reset");
        Ok(())
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn info(&self, id: &SessionId) -> Result<SessionInfo, StoreError> {
        self.lock()
            .get(id)
            .map(|s| s.info(id))
            .ok_or_else(|| StoreError::UnknownSession(id.clone()))
    }

    pub fn set_topic(&self, id: &SessionId, topic: impl Into<String>) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSession(id.clone()))?;
        session.topic = Some(topic.into());
        Ok(())
    }

    pub fn set_stage(&self, id: &SessionId, stage: EssayStage) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSession(id.clone()))?;
        debug!(session = %id, stage = %stage, "stage changed");
        session.stage = stage;
        Ok(())
    }

    /// Ids of all live sessions, sorted.
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Mark the session busy and hand back its flag. The caller clears it
    /// when the request finishes.
    pub(crate) fn begin_request(&self, id: &SessionId) -> Result<Arc<AtomicBool>, StoreError> {
        let sessions = self.lock();
        let session = sessions
            .get(id)
            .ok_or_else(|| StoreError::UnknownSession(id.clone()))?;
        session
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| StoreError::SessionBusy(id.clone()))?;
        Ok(Arc::clone(&session.busy))
    }
}

fn idle_session<'a>(
    sessions: &'a mut HashMap<SessionId, SessionState>,
    id: &SessionId,
) -> Result<&'a mut SessionState, StoreError> {
    let session = sessions
        .get_mut(id)
        .ok_or_else(|| StoreError::UnknownSession(id.clone()))?;
    if session.busy.load(Ordering::Acquire) {
        return Err(StoreError::SessionBusy(id.clone()));
    }
    Ok(session)
}
