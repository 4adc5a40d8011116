use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

const DEFAULT_WEBHOOK_BASE_URL: &str = "http://localhost:5678/webhook";
const DEFAULT_COPY_INDICATOR_MS: u64 = 1500;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;
const DEFAULT_MAX_CHAT_SESSIONS: usize = 1000;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: WebhookEndpoints,
    /// When set, webhook failures are answered with simulated records
    /// instead of being reported to the caller.
    pub fallback_to_simulated: bool,
    pub webhook_timeout: Option<Duration>,
    pub copy_indicator_ttl: Duration,
    /// Chat sessions untouched for this long are discarded.
    pub session_idle_ttl: Duration,
    /// Upper bound on live chat sessions; the least recently used one is
    /// discarded to make room.
    pub max_chat_sessions: usize,
    pub port: u16,
    pub rust_log: String,
}

/// One webhook endpoint per dashboard feature.
#[derive(Debug, Clone)]
pub struct WebhookEndpoints {
    pub chat: Url,
    pub decision: Url,
    pub document: Url,
    pub report: Url,
    pub learning_plan: Url,
    pub cv: Url,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a fixed map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup("WEBHOOK_BASE_URL")
            .unwrap_or_else(|| DEFAULT_WEBHOOK_BASE_URL.to_string());
        let base = base.trim_end_matches('/');

        let endpoint = |key: &str, path: &str| -> Result<Url> {
            let raw = lookup(key).unwrap_or_else(|| format!("{base}/{path}"));
            Url::parse(&raw).with_context(|| format!("{key} must be a valid URL (got '{raw}')"))
        };

        let endpoints = WebhookEndpoints {
            chat: endpoint(
                "CHAT_WEBHOOK_URL",
                "23030f54-6f01-4ed3-be3c-e3237f08f5e0/chat/ai-chat",
            )?,
            decision: endpoint("DECISION_WEBHOOK_URL", "gemini-webhook")?,
            document: endpoint("DOCUMENT_WEBHOOK_URL", "document-analysis")?,
            report: endpoint("REPORT_WEBHOOK_URL", "report-analysis")?,
            learning_plan: endpoint("LEARNING_WEBHOOK_URL", "learning-plan")?,
            cv: endpoint("CV_WEBHOOK_URL", "cv-optimize")?,
        };

        let fallback_to_simulated = match lookup("FALLBACK_TO_SIMULATED") {
            Some(raw) => parse_flag(&raw).context("FALLBACK_TO_SIMULATED must be a boolean")?,
            None => true,
        };

        let webhook_timeout = lookup("WEBHOOK_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .context("WEBHOOK_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?;

        let copy_indicator_ttl = match lookup("COPY_INDICATOR_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .context("COPY_INDICATOR_MS must be a whole number of milliseconds")?,
            None => Duration::from_millis(DEFAULT_COPY_INDICATOR_MS),
        };

        let session_idle_ttl = match lookup("SESSION_IDLE_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
            None => Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
        };
        if session_idle_ttl.is_zero() {
            bail!("SESSION_IDLE_TTL_SECS must be greater than zero");
        }

        let max_chat_sessions = match lookup("MAX_CHAT_SESSIONS") {
            Some(raw) => raw
                .parse::<usize>()
                .context("MAX_CHAT_SESSIONS must be a whole number")?,
            None => DEFAULT_MAX_CHAT_SESSIONS,
        };
        if max_chat_sessions == 0 {
            bail!("MAX_CHAT_SESSIONS must be greater than zero");
        }

        Ok(Config {
            endpoints,
            fallback_to_simulated,
            webhook_timeout,
            copy_indicator_ttl,
            session_idle_ttl,
            max_chat_sessions,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("unrecognised flag value '{other}'"),
    }
}
