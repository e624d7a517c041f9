//! Configuration validation.
//!
//! Checks numeric ranges and required strings, collecting every problem
//! into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::TutorConfig;
use tutor_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TutorConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_provider(&mut errors, config);
    validate_conversation(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_provider(errors: &mut Vec<String>, config: &TutorConfig) {
    let provider = &config.provider;
    validate_non_empty(errors, "provider.model", &provider.model);
    validate_non_empty(errors, "provider.base_url", &provider.base_url);
    if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
        errors.push(format!(
            "provider.base_url = {:?} must start with http:// or https://",
            provider.base_url
        ));
    }
    validate_range(errors, "provider.max_tokens", provider.max_tokens, 1, 16384);
    validate_range_f64(errors, "provider.temperature", provider.temperature, 0.0, 2.0);
    validate_range(errors, "provider.timeout_secs", provider.timeout_secs, 1, 600);
}

fn validate_conversation(errors: &mut Vec<String>, config: &TutorConfig) {
    if let Some(prompt) = &config.conversation.system_prompt {
        validate_non_empty(errors, "conversation.system_prompt", prompt);
    }
    validate_range(
        errors,
        "conversation.history_window",
        config.conversation.history_window,
        0,
        1000,
    );
}
