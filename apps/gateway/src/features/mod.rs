// Feature façade: one typed operation per dashboard panel.
// All webhook traffic goes through `webhook::WebhookClient`; the fallback
// policy lives here and nowhere else.

pub mod chat;
pub mod cv;
pub mod decision;
pub mod document;
pub mod handlers;
pub mod learning_plan;
pub mod report;
pub mod upload;

use std::fmt;
use std::sync::Arc;

use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::WebhookEndpoints;
use crate::webhook::{WebhookClient, WebhookError};

/// The six dashboard features, each backed by its own webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Chat,
    DecisionAnalysis,
    DocumentAnalysis,
    ReportAnalysis,
    LearningPlan,
    CvOptimization,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Chat => "chat",
            Feature::DecisionAnalysis => "decision_analysis",
            Feature::DocumentAnalysis => "document_analysis",
            Feature::ReportAnalysis => "report_analysis",
            Feature::LearningPlan => "learning_plan",
            Feature::CvOptimization => "cv_optimization",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A webhook failure that was not masked by the fallback policy.
#[derive(Debug, Error)]
#[error("{feature} webhook failed: {source}")]
pub struct FeatureError {
    pub feature: Feature,
    #[source]
    pub source: WebhookError,
}

/// Entry point for every feature. Cheap to clone; shared through `AppState`.
#[derive(Clone)]
pub struct FeatureFacade {
    client: WebhookClient,
    endpoints: Arc<WebhookEndpoints>,
    fallback_to_simulated: bool,
}

impl FeatureFacade {
    pub fn new(
        client: WebhookClient,
        endpoints: WebhookEndpoints,
        fallback_to_simulated: bool,
    ) -> Self {
        Self {
            client,
            endpoints: Arc::new(endpoints),
            fallback_to_simulated,
        }
    }

    pub fn fallback_to_simulated(&self) -> bool {
        self.fallback_to_simulated
    }

    fn endpoint(&self, feature: Feature) -> &Url {
        match feature {
            Feature::Chat => &self.endpoints.chat,
            Feature::DecisionAnalysis => &self.endpoints.decision,
            Feature::DocumentAnalysis => &self.endpoints.document,
            Feature::ReportAnalysis => &self.endpoints.report,
            Feature::LearningPlan => &self.endpoints.learning_plan,
            Feature::CvOptimization => &self.endpoints.cv,
        }
    }

    /// Calls the feature's webhook. On failure, either substitutes the
    /// simulated record or reports the error, depending on the fallback flag.
    async fn call<P, T>(
        &self,
        feature: Feature,
        payload: &P,
        simulate: impl FnOnce() -> T,
    ) -> Result<T, FeatureError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.client.post_json(self.endpoint(feature), payload).await {
            Ok(record) => Ok(record),
            Err(source) if self.fallback_to_simulated => {
                warn!(feature = %feature, "Webhook failed, serving simulated response: {source}");
                Ok(simulate())
            }
            Err(source) => Err(FeatureError { feature, source }),
        }
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("héllo wörld", 4), "héll");
        assert_eq!(excerpt("short", 50), "short");
        assert_eq!(excerpt("", 10), "");
    }

    #[test]
    fn test_feature_error_message_names_feature() {
        let err = FeatureError {
            feature: Feature::LearningPlan,
            source: WebhookError::Status {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "learning_plan webhook failed: webhook error: Internal Server Error (status 500)"
        );
    }
}
