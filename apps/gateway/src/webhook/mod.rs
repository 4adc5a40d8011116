//! Webhook Client: the single point of entry for every call to the automation
//! workflow backend.
//!
//! ARCHITECTURAL RULE: No other module may issue HTTP requests to a webhook directly.
//! One POST per call: no retries, no backoff, no auth, no streaming.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("webhook error: {status_text} (status {status})")]
    Status { status: u16, status_text: String },

    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin wrapper over `reqwest::Client` that speaks "POST JSON, read JSON back".
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    /// Builds a client. `timeout` is `None` for the historical behavior of
    /// waiting on the webhook indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, WebhookError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// POSTs `payload` as JSON to `url` and decodes the response body as `T`.
    pub async fn post_json<P, T>(&self, url: &Url, payload: &P) -> Result<T, WebhookError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url.clone())
            .header("content-type", "application/json")
            .json(payload)
            .send()
            .await
            .inspect_err(|e| warn!("Webhook {url} unreachable: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Webhook {url} returned {status}");
            return Err(WebhookError::Status {
                status: status.as_u16(),
                status_text: status_text(status),
            });
        }

        let body = response.text().await?;
        let decoded = serde_json::from_str(&body)
            .inspect_err(|e| warn!("Webhook {url} returned undecodable body: {e}"))?;

        debug!("Webhook call succeeded: url={url}, bytes={}", body.len());
        Ok(decoded)
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
