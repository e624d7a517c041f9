//! Token usage tracking across sessions.

use std::collections::HashMap;

use crate::{SessionId, TokenUsage};

/// Tracks cumulative token usage overall and per session.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    /// Total usage across all sessions.
    total: TokenUsage,
    /// Usage broken down by session.
    by_session: HashMap<SessionId, TokenUsage>,
    /// Number of successful completion calls.
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from a completion call.
    pub fn record(&mut self, session: &SessionId, usage: &TokenUsage) {
        self.total.input_tokens += usage.input_tokens;
        self.total.output_tokens += usage.output_tokens;
        self.call_count += 1;

        let entry = self.by_session.entry(session.clone()).or_default();
        entry.input_tokens += usage.input_tokens;
        entry.output_tokens += usage.output_tokens;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_session(&self, session: &SessionId) -> Option<&TokenUsage> {
        self.by_session.get(session)
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}
