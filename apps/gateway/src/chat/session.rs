//! Chat session state machine.
//!
//! States: `Idle` and `AwaitingResponse`. A send is accepted only from `Idle`
//! with non-blank input; it appends the user message immediately and moves to
//! `AwaitingResponse`. Settlement always returns to `Idle` and appends at most
//! one assistant message.

use serde::Serialize;
use thiserror::Error;
use tokio::time::{Duration, Instant};
use tracing::warn;
use uuid::Uuid;

use crate::chat::prompts::{REPLY_FAILED_NOTIFICATION, SUGGESTED_PROMPTS};
use crate::errors::AppError;
use crate::features::FeatureError;
use crate::models::message::{ChatMessage, ChatTurn, Role};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// Why a send was a no-op.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    BlankInput,
    AwaitingResponse,
}

/// Result of one send, as reported back to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SendOutcome {
    Ignored {
        reason: IgnoreReason,
    },
    Replied {
        user_message: ChatMessage,
        assistant_message: ChatMessage,
    },
    /// The user message stays; no assistant message was added for this turn.
    Failed {
        user_message: ChatMessage,
        notification: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum CopyError {
    #[error("Message {0} not found")]
    UnknownMessage(String),

    #[error("Message {0} is not an assistant reply")]
    NotAssistant(String),
}

impl From<CopyError> for AppError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::UnknownMessage(_) => AppError::NotFound(err.to_string()),
            CopyError::NotAssistant(_) => AppError::Validation(err.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct CopiedMarker {
    message_id: String,
    at: Instant,
}

#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
    state: SessionState,
    copied: Option<CopiedMarker>,
    notification: Option<String>,
}

/// Serializable view of a session at a given instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: SessionState,
    pub messages: Vec<ChatMessage>,
    pub copied_message_id: Option<String>,
    pub notification: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_prompts: Vec<&'static str>,
}

impl ChatSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            messages: Vec::new(),
            state: SessionState::Idle,
            copied: None,
            notification: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Accepts a send if the guards allow it. On success the trimmed user
    /// message has been appended and the history to forward is returned.
    pub fn begin_send(&mut self, input: &str) -> Result<(ChatMessage, Vec<ChatTurn>), IgnoreReason> {
        let content = input.trim();
        if content.is_empty() {
            return Err(IgnoreReason::BlankInput);
        }
        if self.state == SessionState::AwaitingResponse {
            return Err(IgnoreReason::AwaitingResponse);
        }

        let user_message = ChatMessage::user(content);
        self.messages.push(user_message.clone());
        self.state = SessionState::AwaitingResponse;
        self.notification = None;

        let history = self.messages.iter().map(ChatTurn::from).collect();
        Ok((user_message, history))
    }

    /// Settles the in-flight send. Always returns the session to `Idle`.
    pub fn finish_send(
        &mut self,
        user_message: ChatMessage,
        reply: Result<String, FeatureError>,
    ) -> SendOutcome {
        self.state = SessionState::Idle;

        match reply {
            Ok(content) => {
                let assistant_message = ChatMessage::assistant(content);
                self.messages.push(assistant_message.clone());
                SendOutcome::Replied {
                    user_message,
                    assistant_message,
                }
            }
            Err(e) => {
                warn!(session = %self.id, "Chat reply failed: {e}");
                self.notification = Some(REPLY_FAILED_NOTIFICATION.to_string());
                SendOutcome::Failed {
                    user_message,
                    notification: REPLY_FAILED_NOTIFICATION.to_string(),
                }
            }
        }
    }

    /// Settles a send whose reply never arrived (the reply task died).
    /// Same end state as a failed reply: `Idle`, user message kept, notification set.
    pub fn abandon_send(&mut self, user_message: ChatMessage) {
        if self.state != SessionState::AwaitingResponse {
            return;
        }
        warn!(session = %self.id, message = %user_message.id, "Chat reply abandoned");
        self.state = SessionState::Idle;
        self.notification = Some(REPLY_FAILED_NOTIFICATION.to_string());
    }

    /// Marks an assistant message as copied and returns it. The marker
    /// replaces any earlier one.
    pub fn copy(&mut self, message_id: &str, now: Instant) -> Result<&ChatMessage, CopyError> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| CopyError::UnknownMessage(message_id.to_string()))?;

        if self.messages[index].role != Role::Assistant {
            return Err(CopyError::NotAssistant(message_id.to_string()));
        }

        self.copied = Some(CopiedMarker {
            message_id: message_id.to_string(),
            at: now,
        });
        Ok(&self.messages[index])
    }

    /// Id of the message last copied, while its indicator is still showing.
    pub fn copied_message_id(&self, now: Instant, ttl: Duration) -> Option<&str> {
        self.copied
            .as_ref()
            .filter(|marker| now.saturating_duration_since(marker.at) < ttl)
            .map(|marker| marker.message_id.as_str())
    }

    pub fn snapshot(&self, now: Instant, ttl: Duration) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id(),
            state: self.state(),
            messages: self.messages().to_vec(),
            copied_message_id: self.copied_message_id(now, ttl).map(str::to_string),
            notification: self.notification.clone(),
            suggested_prompts: if self.messages.is_empty() {
                SUGGESTED_PROMPTS.to_vec()
            } else {
                Vec::new()
            },
        }
    }
}
