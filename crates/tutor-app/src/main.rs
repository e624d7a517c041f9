mod cli;
mod harness;
mod repl;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tutor_ai::{AiClient, OpenAiClient, OpenAiConfig, SessionId, TutorAgent, TutorSettings};
use tutor_common::TutorAppError;
use tutor_config::TutorConfig;

use cli::Command;

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Existing variables win. Only the current directory and the workspace
/// root are searched.
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        // Workspace root, two levels up from crates/tutor-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn log_directives(level: &str) -> String {
    format!("tutor={level},tutor_ai={level},tutor_config={level}")
}

/// `--log-level` beats `RUST_LOG`, which beats the config file.
fn init_logging(cli_level: Option<&str>, config: &TutorConfig) {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(log_directives(level)),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(log_directives(config.logging.level.as_directive()))),
    }
    .unwrap_or_else(|_| EnvFilter::new(log_directives("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn tutor_settings(config: &TutorConfig) -> TutorSettings {
    let settings = TutorSettings::default().with_history_window(config.conversation.history_window());
    match &config.conversation.system_prompt {
        Some(prompt) => settings.with_system_prompt(prompt.clone()),
        None => settings,
    }
}

/// Build the provider client. This is the only place the API key is read
/// from the environment.
fn build_client(config: &TutorConfig) -> Result<Arc<dyn AiClient>, TutorAppError> {
    let provider = &config.provider;
    let api_key = provider.resolve_api_key(std::env::var("OPENAI_API_KEY").ok())?;
    let openai = OpenAiConfig::new(api_key)
        .with_model(provider.model.clone())
        .with_base_url(provider.base_url.clone())
        .with_max_tokens(provider.max_tokens)
        .with_temperature(provider.temperature)
        .with_timeout(Duration::from_secs(u64::from(provider.timeout_secs)));
    tracing::info!(model = %openai.model, "provider client ready");
    let client = OpenAiClient::new(openai).map_err(|e| TutorAppError::Ai(e.to_string()))?;
    Ok(Arc::new(client))
}

async fn run(args: cli::Args) -> Result<(), TutorAppError> {
    let config = tutor_config::load_config(args.config.as_deref())?;
    init_logging(args.log_level.as_deref(), &config);

    tracing::info!("essay tutor v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("using config override: {}", path.display());
    }

    match args.command.unwrap_or_default() {
        Command::Config => {
            println!("{}", tutor_config::config_to_json(&config));
            Ok(())
        }
        Command::Chat { session } => {
            let agent = TutorAgent::new(build_client(&config)?, tutor_settings(&config));
            repl::run(&agent, SessionId::from(session)).await
        }
        Command::Scenarios {
            offline,
            output_dir,
        } => {
            let client: Arc<dyn AiClient> = if offline {
                Arc::new(harness::offline_client())
            } else {
                build_client(&config)?
            };
            let output_dir = output_dir.unwrap_or_else(|| config.transcripts.output_dir.clone());
            let harness = harness::Harness::new(client, tutor_settings(&config));

            let saved = harness.run_and_save(&output_dir).await?;
            let failed = saved.iter().filter(|(report, _)| !report.passed()).count();
            for (report, path) in &saved {
                let status = if report.passed() { "PASS" } else { "FAIL" };
                println!("{status} {:<22} -> {}", report.test_name, path.display());
            }
            if failed > 0 {
                return Err(TutorAppError::Other(format!("{failed} scenario(s) failed")));
            }
            println!("All scenarios passed. Transcripts are in {}", output_dir.display());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = cli::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut config = TutorConfig::default();
        config.conversation.history_window = 10;
        config.conversation.system_prompt = Some("Be brief.".into());

        let settings = tutor_settings(&config);
        assert_eq!(settings.history_window, Some(10));
        assert_eq!(settings.system_prompt, "Be brief.");
    }

    #[test]
    fn default_settings_use_builtin_persona() {
        let settings = tutor_settings(&TutorConfig::default());
        assert_eq!(settings.system_prompt, tutor_ai::DEFAULT_SYSTEM_PROMPT);
        assert_eq!(settings.history_window, None);
    }

    #[test]
    fn build_client_with_configured_key() {
        let mut config = TutorConfig::default();
        config.provider.api_key = Some("sk-test".into());
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn log_directives_cover_all_crates() {
        let d = log_directives("debug");
        assert!(d.contains("tutor=debug"));
        assert!(d.contains("tutor_ai=debug"));
        assert!(d.contains("tutor_config=debug"));
    }
}
