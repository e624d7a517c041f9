//! The four scripted scenarios.

use std::sync::Arc;

use chrono::Local;
use tutor_ai::{
    AiError, EssayStage, Role, ScriptedClient, SessionId, StoreError, TutorAgent, TutorError,
    TutorSettings,
};
use tutor_common::ConfigError;
use tutor_config::ProviderConfig;

use super::{Exchange, ScenarioReport};

fn preview(text: &str) -> String {
    let short: String = text.chars().take(50).collect();
    if short.len() < text.len() {
        format!("{short}...")
    } else {
        short
    }
}

pub(super) async fn basic_functionality(agent: &TutorAgent) -> ScenarioReport {
    let mut report = ScenarioReport::new("basic_functionality");

    report.check(
        "initialization",
        if agent.store().is_empty() {
            Ok(format!(
                "TutorAgent initialized ({} char system prompt)",
                agent.settings().system_prompt.len()
            ))
        } else {
            Err("new agent already holds sessions".into())
        },
    );

    let test_session = SessionId::from("test_session");
    report.check(
        "session_creation",
        match agent.create_session(&test_session).and_then(|()| agent.history(&test_session)) {
            Ok(history) if history.len() == 1 && history[0].role == Role::System => {
                Ok(format!("Session created with ID: {test_session}"))
            }
            Ok(history) => Err(format!(
                "expected a single system message, found {} messages",
                history.len()
            )),
            Err(e) => Err(e.to_string()),
        },
    );

    report.check(
        "duplicate_session",
        match agent.create_session(&test_session) {
            Err(TutorError::Store(StoreError::DuplicateSession(_))) => {
                Ok("Second create rejected, history untouched".into())
            }
            Ok(()) => Err("second create succeeded".into()),
            Err(e) => Err(format!("unexpected error: {e}")),
        },
    );

    let conversation = SessionId::from("conversation_test");
    report.check(
        "conversation",
        match agent.respond(&conversation, "Hello").await {
            Ok(reply) if !reply.trim().is_empty() => Ok(format!("Got response: {}", preview(&reply))),
            Ok(_) => Err("empty reply".into()),
            Err(e) => Err(e.to_string()),
        },
    );
    report.transcript = agent.history(&conversation).unwrap_or_default();
    report.record_usage(&agent.usage());

    report
}

pub(super) async fn conversation_flow(agent: &TutorAgent) -> ScenarioReport {
    let mut report = ScenarioReport::new("conversation_flow");
    let session = SessionId::from("flow_test");
    let messages = [
        "Hello, I want to write an essay",
        "I want to write about climate change",
        "Can you help me create an outline?",
        "How do I write a good thesis statement?",
    ];

    let mut failure = None;
    for message in messages {
        match agent.respond(&session, message).await {
            Ok(reply) => report.conversation.push(Exchange {
                user_message: message.to_string(),
                tutor_response: reply,
                timestamp: Local::now(),
            }),
            Err(e) => {
                failure = Some(format!("{message:?}: {e}"));
                break;
            }
        }
    }

    let history = agent.history(&session).unwrap_or_default();
    let outcome = match failure {
        Some(e) => Err(e),
        None if history.len() == 1 + 2 * messages.len()
            && history.last().map(|m| m.role) == Some(Role::Assistant) =>
        {
            Ok(format!(
                "Completed conversation with {} messages",
                messages.len()
            ))
        }
        None => Err(format!("history has {} messages", history.len())),
    };
    report.check("conversation_flow", outcome);
    report.transcript = history;
    report.record_usage(&agent.usage());

    report
}

pub(super) async fn session_management(agent: &TutorAgent) -> ScenarioReport {
    let mut report = ScenarioReport::new("session_management");
    let ids: Vec<SessionId> = ["session1", "session2", "session3"]
        .into_iter()
        .map(SessionId::from)
        .collect();

    let created = ids.iter().try_for_each(|id| {
        agent.create_session(id)?;
        agent.set_topic(id, &format!("Topic for {id}"))
    });
    report.check(
        "create_sessions",
        created
            .map(|()| format!("Managed {} sessions", ids.len()))
            .map_err(|e| e.to_string()),
    );

    let isolated = async {
        agent.set_stage(&ids[1], EssayStage::Brainstorming)?;
        agent
            .respond(&ids[1], "I want to write about climate change")
            .await?;
        let leaked = [&ids[0], &ids[2]]
            .into_iter()
            .map(|id| agent.history(id))
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .flatten()
            .any(|m| m.role != Role::System);
        Ok::<bool, TutorError>(leaked)
    };
    report.check(
        "session_isolation",
        match isolated.await {
            Ok(false) => Ok("Messages stayed in session2".into()),
            Ok(true) => Err("messages leaked into another session".into()),
            Err(e) => Err(e.to_string()),
        },
    );

    report.sessions = agent
        .store()
        .session_ids()
        .iter()
        .filter_map(|id| agent.session_info(id).ok())
        .collect();

    report.check(
        "reset_session",
        match agent
            .reset_session(&ids[1])
            .and_then(|()| agent.session_info(&ids[1]))
        {
            Ok(info) if info.message_count == 1 && info.topic.is_none() => {
                Ok("session2 reset to its system prime".into())
            }
            Ok(info) => Err(format!("{} messages after reset", info.message_count)),
            Err(e) => Err(e.to_string()),
        },
    );

    report.check(
        "clear_session",
        match agent.clear_session(&ids[2]).and_then(|()| agent.history(&ids[2])) {
            Err(TutorError::Store(StoreError::UnknownSession(_))) => {
                Ok("session3 removed; history now reports unknown session".into())
            }
            Ok(_) => Err("history still available after clear".into()),
            Err(e) => Err(format!("unexpected error: {e}")),
        },
    );
    report.record_usage(&agent.usage());

    report
}

/// Uses its own failing client so it behaves the same online and offline.
pub(super) async fn error_handling(settings: &TutorSettings) -> ScenarioReport {
    let mut report = ScenarioReport::new("error_handling");

    report.check(
        "no_api_key",
        match ProviderConfig::default().resolve_api_key(None) {
            Err(e @ ConfigError::MissingApiKey) => Ok(e.to_string()),
            Err(e) => Err(format!("unexpected error: {e}")),
            Ok(_) => Err("a key was resolved from nothing".into()),
        },
    );

    let failing = Arc::new(ScriptedClient::default());
    failing.push_error(AiError::ApiError("API Error".into()));
    let agent = TutorAgent::new(failing, settings.clone());
    let session = SessionId::from("error_test");

    let outcome = match agent.respond(&session, "Hello").await {
        Err(TutorError::Completion(cause)) => match agent.history(&session) {
            Ok(history)
                if history.len() == 2
                    && history.last().map(|m| m.role) == Some(Role::User) =>
            {
                Ok(format!("Error surfaced ({cause}); user turn kept for retry"))
            }
            Ok(history) => Err(format!("history has {} messages", history.len())),
            Err(e) => Err(e.to_string()),
        },
        Ok(reply) => Err(format!("expected failure, got reply {}", preview(&reply))),
        Err(e) => Err(format!("unexpected error: {e}")),
    };
    report.check("provider_error", outcome);
    report.transcript = agent.history(&session).unwrap_or_default();
    report.record_usage(&agent.usage());

    report.check(
        "unknown_session",
        match agent.history(&SessionId::from("never_created")) {
            Err(TutorError::Store(StoreError::UnknownSession(id))) => {
                Ok(format!("history({id}) rejected"))
            }
            Ok(_) => Err("history returned for a session that was never created".into()),
            Err(e) => Err(format!("unexpected error: {e}")),
        },
    );

    report.check(
        "empty_message",
        match agent.respond(&session, "   ").await {
            Err(TutorError::EmptyMessage) => Ok("blank input rejected".into()),
            Ok(_) => Err("blank input was sent".into()),
            Err(e) => Err(format!("unexpected error: {e}")),
        },
    );

    report
}
