//! Completion provider settings.

use std::fmt;

use serde::{Deserialize, Serialize};
use tutor_common::ConfigError;

/// Connection and sampling settings for the chat-completions endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Usually left unset and taken from `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Valid range: 1-16384.
    pub max_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    /// Whole-request timeout in seconds (valid range: 1-600).
    pub timeout_secs: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            base_url: "https://api.openai.com/v1".into(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Pick the API key: the configured value wins, then `env_key`
    /// (the caller's reading of `OPENAI_API_KEY`). Blank values count as unset.
    pub fn resolve_api_key(&self, env_key: Option<String>) -> Result<String, ConfigError> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env_key.filter(|k| !k.trim().is_empty()))
            .ok_or(ConfigError::MissingApiKey)
    }
}
