//! Tests for the validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = TutorConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_max_tokens() {
    let mut config = TutorConfig::default();
    config.provider.max_tokens = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.max_tokens"));
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = TutorConfig::default();
    config.provider.temperature = 3.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.temperature"));
}

#[test]
fn catches_timeout_too_large() {
    let mut config = TutorConfig::default();
    config.provider.timeout_secs = 3600;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.timeout_secs"));
}

#[test]
fn catches_blank_model_and_bad_url() {
    let mut config = TutorConfig::default();
    config.provider.model = "  ".into();
    config.provider.base_url = "api.openai.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("provider.model"));
    assert!(err.contains("provider.base_url"));
}

#[test]
fn catches_blank_system_prompt() {
    let mut config = TutorConfig::default();
    config.conversation.system_prompt = Some(String::new());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("conversation.system_prompt"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = TutorConfig::default();
    config.provider.max_tokens = 0;
    config.provider.timeout_secs = 0;
    config.conversation.history_window = 5000;
    let err = validate(&config).unwrap_err().to_string();
    assert_eq!(err.matches("out of range").count(), 3);
}
