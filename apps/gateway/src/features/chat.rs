//! Dual-model chat: the workflow answers with a primary (selected) reply and
//! an alternative reply from the other model.

use serde::{Deserialize, Serialize};

use super::{excerpt, Feature, FeatureError, FeatureFacade};
use crate::models::message::ChatTurn;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiModel {
    Gemini,
    Deepseek,
}

/// Chat answer as returned to the dashboard.
///
/// Deserialization goes through [`DualModelReply`], the shape the chat
/// webhook actually sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "DualModelReply")]
pub struct AiResponse {
    pub content: String,
    pub model: AiModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_model: Option<AiModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualModelReply {
    primary: ModelReply,
    #[serde(default)]
    alternative: Option<ModelReply>,
    selected_model: AiModel,
}

#[derive(Debug, Deserialize)]
struct ModelReply {
    content: String,
    model: AiModel,
}

impl From<DualModelReply> for AiResponse {
    fn from(reply: DualModelReply) -> Self {
        let (alternative_content, alternative_model) = match reply.alternative {
            Some(alt) => (Some(alt.content), Some(alt.model)),
            None => (None, None),
        };
        Self {
            content: reply.primary.content,
            model: reply.selected_model,
            alternative_content,
            alternative_model,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    messages: &'a [ChatTurn],
}

impl FeatureFacade {
    /// Sends the conversation so far and returns the assistant's answer.
    pub async fn send_chat(&self, messages: &[ChatTurn]) -> Result<AiResponse, FeatureError> {
        self.call(Feature::Chat, &ChatPayload { messages }, || {
            simulated_chat(messages)
        })
        .await
    }
}

pub fn simulated_chat(messages: &[ChatTurn]) -> AiResponse {
    let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
    AiResponse {
        content: format!("Simulated response to: \"{}...\"", excerpt(last, 50)),
        model: AiModel::Gemini,
        alternative_content: Some("Alternative response from DeepSeek (simulated)".to_string()),
        alternative_model: Some(AiModel::Deepseek),
    }
}
