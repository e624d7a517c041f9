//! Configuration schema types for the essay tutor.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the tutor has always used.

mod conversation;
mod provider;
mod system;

pub use conversation::*;
pub use provider::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TutorConfig {
    pub provider: ProviderConfig,
    pub conversation: ConversationConfig,
    pub transcripts: TranscriptsConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_matches_legacy_settings() {
        let config = TutorConfig::default();
        assert_eq!(config.provider.model, "gpt-3.5-turbo");
        assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
        assert_eq!(config.provider.max_tokens, 500);
        assert!((config.provider.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.provider.timeout_secs, 60);
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn default_conversation_sends_full_history() {
        let config = TutorConfig::default();
        assert_eq!(config.conversation.history_window, 0);
        assert!(config.conversation.system_prompt.is_none());
        assert_eq!(config.conversation.history_window(), None);
    }

    #[test]
    fn history_window_zero_means_unbounded() {
        let mut config = TutorConfig::default();
        config.conversation.history_window = 10;
        assert_eq!(config.conversation.history_window(), Some(10));
    }

    #[test]
    fn default_transcripts_and_logging() {
        let config = TutorConfig::default();
        assert_eq!(config.transcripts.output_dir, std::path::PathBuf::from("data"));
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: TutorConfig = toml::from_str(
            r#"
[provider]
model = "gpt-4o-mini"
"#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.max_tokens, 500);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: TutorConfig = toml::from_str(
            r#"
[logging]
level = "WARNING"
"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.logging.level.as_directive(), "warn");
    }
}
