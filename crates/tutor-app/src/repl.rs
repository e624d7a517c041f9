//! Interactive terminal chat.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tutor_ai::{EssayStage, Message, Role, SessionId, SessionInfo, TokenUsage, TutorAgent};
use tutor_common::TutorAppError;

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    Reset,
    History,
    Info,
    Topic(&'a str),
    Stage(&'a str),
    Empty,
    Say(&'a str),
}

fn parse_command(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => return ReplCommand::Empty,
        "quit" | "exit" => return ReplCommand::Quit,
        "reset" => return ReplCommand::Reset,
        "history" => return ReplCommand::History,
        "info" => return ReplCommand::Info,
        _ => {}
    }
    if let Some((head, rest)) = line.split_once(char::is_whitespace) {
        let rest = rest.trim();
        if head.eq_ignore_ascii_case("topic") {
            return ReplCommand::Topic(rest);
        }
        if head.eq_ignore_ascii_case("stage") {
            return ReplCommand::Stage(rest);
        }
    }
    ReplCommand::Say(line)
}

/// Render history the way the chat shows it; the system prime is hidden.
fn format_history(history: &[Message]) -> String {
    history
        .iter()
        .filter_map(|m| match m.role {
            Role::System => None,
            Role::User => Some(format!("You: {}", m.content)),
            Role::Assistant => Some(format!("Tutor: {}", m.content)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_info(info: &SessionInfo, usage: Option<&TokenUsage>) -> String {
    format!(
        "Session {} | stage: {} | topic: {} | messages: {} | tokens: {}",
        info.id,
        info.stage,
        info.topic.as_deref().unwrap_or("(none)"),
        info.message_count,
        usage.map_or(0, TokenUsage::total_tokens)
    )
}

fn prompt() -> Result<(), TutorAppError> {
    print!("\nYou: ");
    std::io::stdout().flush()?;
    Ok(())
}

pub async fn run(agent: &TutorAgent, session: SessionId) -> Result<(), TutorAppError> {
    println!("Welcome to the Essay Writing Tutor!");
    println!("Type 'quit' to exit, 'reset' to start over, 'history' to see conversation history");
    println!("'info' shows your session; 'topic <text>' and 'stage <name>' record your progress");

    agent.store().ensure_session(&session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!("\nGoodbye! Keep practicing your essay writing!");
            break;
        };

        match parse_command(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                println!("Goodbye! Keep practicing your essay writing!");
                break;
            }
            ReplCommand::Reset => match agent.reset_session(&session) {
                Ok(()) => println!("Session reset. Let's start fresh!"),
                Err(e) => println!("An error occurred: {e}"),
            },
            ReplCommand::History => match agent.history(&session) {
                Ok(history) => println!("\nConversation History:\n{}", format_history(&history)),
                Err(e) => println!("An error occurred: {e}"),
            },
            ReplCommand::Info => match agent.session_info(&session) {
                Ok(info) => println!(
                    "{}",
                    format_info(&info, agent.usage().for_session(&session))
                ),
                Err(e) => println!("An error occurred: {e}"),
            },
            ReplCommand::Topic(topic) => match agent.set_topic(&session, topic) {
                Ok(()) => println!("Topic set to: {topic}"),
                Err(e) => println!("An error occurred: {e}"),
            },
            ReplCommand::Stage(name) => {
                let result = name
                    .to_lowercase()
                    .parse::<EssayStage>()
                    .map_err(|e| e.to_string())
                    .and_then(|stage| {
                        agent
                            .set_stage(&session, stage)
                            .map(|()| stage)
                            .map_err(|e| e.to_string())
                    });
                match result {
                    Ok(stage) => println!("Stage set to: {stage}"),
                    Err(e) => println!("An error occurred: {e}"),
                }
            }
            ReplCommand::Say(text) => {
                print!("Tutor: ");
                std::io::stdout().flush()?;
                match agent.respond(&session, text).await {
                    Ok(reply) => println!("{reply}"),
                    // History keeps the user turn; resubmitting retries with full context.
                    Err(e) => println!("\nAn error occurred: {e}"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!(parse_command("quit"), ReplCommand::Quit);
        assert_eq!(parse_command("  QUIT "), ReplCommand::Quit);
        assert_eq!(parse_command("Reset"), ReplCommand::Reset);
        assert_eq!(parse_command("history"), ReplCommand::History);
        assert_eq!(parse_command("info"), ReplCommand::Info);
        assert_eq!(parse_command("   "), ReplCommand::Empty);
    }

    #[test]
    fn parses_topic_and_stage() {
        assert_eq!(
            parse_command("topic Climate change"),
            ReplCommand::Topic("Climate change")
        );
        assert_eq!(parse_command("stage outline"), ReplCommand::Stage("outline"));
    }

    #[test]
    fn topic_and_stage_ignore_case() {
        assert_eq!(parse_command("Topic Climate"), ReplCommand::Topic("Climate"));
        assert_eq!(parse_command("STAGE  Outline"), ReplCommand::Stage("Outline"));
        assert_eq!(parse_command("topic"), ReplCommand::Say("topic"));
    }

    #[test]
    fn info_line_includes_token_count() {
        let info = SessionInfo {
            id: SessionId::from("web_session"),
            topic: Some("Climate change".into()),
            stage: EssayStage::Outline,
            message_count: 5,
            created_at: chrono::Utc::now(),
        };
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 30,
        };

        assert_eq!(
            format_info(&info, Some(&usage)),
            "Session web_session | stage: outline | topic: Climate change | messages: 5 | tokens: 150"
        );
        assert!(format_info(&info, None).ends_with("tokens: 0"));
    }

    #[test]
    fn anything_else_is_sent_to_the_tutor() {
        assert_eq!(
            parse_command("  How do I write a thesis?  "),
            ReplCommand::Say("How do I write a thesis?")
        );
        assert_eq!(parse_command("quitting is hard"), ReplCommand::Say("quitting is hard"));
    }

    #[test]
    fn history_hides_system_prime() {
        let history = vec![
            Message::system("persona"),
            Message::user("Hello"),
            Message::assistant("Hi! What topic?"),
        ];
        assert_eq!(format_history(&history), "You: Hello\nTutor: Hi! What topic?");
    }
}
