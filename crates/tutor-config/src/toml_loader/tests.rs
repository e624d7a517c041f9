//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_essay_tutor_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, tutor_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[provider]
model = "gpt-4o-mini"
temperature = 0.2

[conversation]
history_window = 10
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert!((config.provider.temperature - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.conversation.history_window(), Some(10));
    // Defaults preserved
    assert_eq!(config.provider.max_tokens, 500);
    assert_eq!(config.transcripts.output_dir, Path::new("data"));
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, tutor_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[provider]
max_tokens = 0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.provider.max_tokens, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("essay-tutor").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.provider.model, "gpt-3.5-turbo");
    assert!(config.provider.api_key.is_none());
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::TutorConfig;

    let config: TutorConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("essay-tutor"));
        assert!(path_str.ends_with("config.toml"));
    }
}
