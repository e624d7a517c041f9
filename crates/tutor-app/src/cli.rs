use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Essay tutor: a conversational essay-writing coach backed by a hosted LLM.
#[derive(Parser, Debug)]
#[command(name = "tutor", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Chat with the tutor in the terminal (default).
    Chat {
        /// Session name; reuse it to keep one conversation per name.
        #[arg(short, long, default_value = "test_session")]
        session: String,
    },
    /// Run the scripted scenarios and write JSON transcripts.
    Scenarios {
        /// Use canned replies instead of calling the provider.
        #[arg(long)]
        offline: bool,

        /// Transcript directory (defaults to `transcripts.output_dir`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the effective configuration as JSON.
    Config,
}

impl Default for Command {
    fn default() -> Self {
        Command::Chat {
            session: "test_session".into(),
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
