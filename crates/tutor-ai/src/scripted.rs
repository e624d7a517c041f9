//! Offline `AiClient` that replays canned replies.
//!
//! Drives `tutor scenarios --offline` and the agent tests: replies are
//! returned in the order they were queued, failures can be injected, and
//! every request is recorded for inspection.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{AiClient, AiError, AiResponse, Message, TokenUsage};

/// Reply used once the queue runs dry.
pub const FALLBACK_REPLY: &str = "Thank you for your question!";

#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedClient {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock_replies().push_back(Ok(reply.into()));
    }

    /// Queue a failure; it is returned by the next call that reaches it.
    pub fn push_error(&self, error: AiError) {
        self.lock_replies().push_back(Err(error));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, AiError>>> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(messages.to_vec());

        let next = self
            .lock_replies()
            .pop_front()
            .unwrap_or_else(|| Ok(FALLBACK_REPLY.to_string()));
        let content = next?;

        let input_tokens = messages
            .iter()
            .map(|m| m.content.split_whitespace().count() as u64)
            .sum();
        Ok(AiResponse {
            usage: TokenUsage {
                input_tokens,
                output_tokens: content.split_whitespace().count() as u64,
            },
            content,
        })
    }
}
