// Assistant panel: per-session conversation state driven over HTTP.

pub mod handlers;
pub mod prompts;
pub mod session;
pub mod store;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::chat::session::SendOutcome;
use crate::chat::store::SharedSession;
use crate::errors::AppError;
use crate::features::chat::AiResponse;
use crate::features::{FeatureError, FeatureFacade};
use crate::models::message::ChatTurn;

/// Source of assistant replies for chat sessions.
///
/// Carried in `AppState` as `Arc<dyn Assistant>`; the default is the
/// feature façade's chat webhook.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, history: &[ChatTurn]) -> Result<AiResponse, FeatureError>;
}

#[async_trait]
impl Assistant for FeatureFacade {
    async fn reply(&self, history: &[ChatTurn]) -> Result<AiResponse, FeatureError> {
        self.send_chat(history).await
    }
}

/// Runs one send through the session state machine.
///
/// The session lock is held only while the guards are checked and while the
/// result is recorded, never across the webhook call, so a concurrent send to
/// the same session sees `AwaitingResponse` and is ignored.
///
/// The reply and its settlement run on their own task: dropping this future
/// (client disconnect) does not leave the session stuck in `AwaitingResponse`.
pub async fn send_message(
    session: SharedSession,
    assistant: Arc<dyn Assistant>,
    input: &str,
) -> Result<SendOutcome, AppError> {
    let (user_message, history) = match session.lock().await.begin_send(input) {
        Ok(accepted) => accepted,
        Err(reason) => return Ok(SendOutcome::Ignored { reason }),
    };

    let settle = {
        let session = session.clone();
        let user_message = user_message.clone();
        tokio::spawn(async move {
            let reply = assistant.reply(&history).await.map(|r| r.content);
            session.lock().await.finish_send(user_message, reply)
        })
    };

    match settle.await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            session.lock().await.abandon_send(user_message);
            Err(AppError::Internal(anyhow!("chat reply task failed: {e}")))
        }
    }
}
