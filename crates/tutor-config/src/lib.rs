//! Essay tutor configuration.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tutor_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ConversationConfig, LogLevel, LoggingConfig, ProviderConfig, TranscriptsConfig, TutorConfig,
};

use std::path::Path;
use tutor_common::ConfigError;

/// Load and validate the config.
///
/// An explicit `path` must exist. Without one, `config.toml` is read from
/// the OS config directory and a commented default is written if missing.
pub fn load_config(path: Option<&Path>) -> Result<TutorConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with the API key masked.
pub fn config_to_json(config: &TutorConfig) -> String {
    let mut redacted = config.clone();
    if redacted.provider.api_key.is_some() {
        redacted.provider.api_key = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&TutorConfig::default());
        assert!(json.contains("\"provider\""));
        assert!(json.contains("\"conversation\""));
        assert!(json.contains("\"transcripts\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_masks_api_key() {
        let mut config = TutorConfig::default();
        config.provider.api_key = Some("sk-live-123".into());
        let json = config_to_json(&config);
        assert!(!json.contains("sk-live-123"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn load_config_rejects_invalid_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\ntemperature = 9.0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_missing_explicit_file() {
        let err = load_config(Some(Path::new("/tmp/essay_tutor_missing/config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
