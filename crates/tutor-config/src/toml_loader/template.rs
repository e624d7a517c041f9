//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Essay Tutor Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[provider]
# api_key = ""           # leave unset to use OPENAI_API_KEY
# model = "gpt-3.5-turbo"
# base_url = "https://api.openai.com/v1"
# max_tokens = 500       # 1-16384
# temperature = 0.7      # 0.0-2.0
# timeout_secs = 60      # 1-600

[conversation]
# system_prompt = "You are an expert essay writing tutor..."
# history_window = 0     # 0 = send the whole conversation, otherwise last N turns

[transcripts]
# output_dir = "data"

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
