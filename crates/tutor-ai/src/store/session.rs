//! Per-session state and the snapshot handed to callers.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Message, SessionId};

/// Where the student is in the essay-writing process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EssayStage {
    #[default]
    TopicSelection,
    Brainstorming,
    Outline,
    Writing,
    Revision,
}

impl EssayStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            EssayStage::TopicSelection => "topic_selection",
            EssayStage::Brainstorming => "brainstorming",
            EssayStage::Outline => "outline",
            EssayStage::Writing => "writing",
            EssayStage::Revision => "revision",
        }
    }
}

impl fmt::Display for EssayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EssayStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topic_selection" => Ok(EssayStage::TopicSelection),
            "brainstorming" => Ok(EssayStage::Brainstorming),
            "outline" => Ok(EssayStage::Outline),
            "writing" => Ok(EssayStage::Writing),
            "revision" => Ok(EssayStage::Revision),
            other => Err(format!(
                "unknown essay stage {other:?} (expected topic_selection, brainstorming, \
                 outline, writing or revision)"
            )),
        }
    }
}

/// Read-only summary of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub topic: Option<String>,
    pub stage: EssayStage,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
}

pub(super) struct SessionState {
    pub(super) messages: Vec<Message>,
    pub(super) topic: Option<String>,
    pub(super) stage: EssayStage,
    pub(super) created_at: DateTime<Utc>,
    /// Set while a `TutorAgent::respond` call is in flight for this session.
    pub(super) busy: Arc<AtomicBool>,
}

impl SessionState {
    pub(super) fn new(prime: Option<&str>) -> Self {
        Self {
            messages: prime.map(Message::system).into_iter().collect(),
            topic: None,
            stage: EssayStage::default(),
            created_at: Utc::now(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(super) fn info(&self, id: &SessionId) -> SessionInfo {
        SessionInfo {
            id: id.clone(),
            topic: self.topic.clone(),
            stage: self.stage,
            message_count: self.messages.len(),
            created_at: self.created_at,
        }
    }
}
