mod chat;
mod config;
mod errors;
mod features;
mod models;
mod routes;
mod state;
mod webhook;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::features::FeatureFacade;
use crate::routes::build_router;
use crate::state::AppState;
use crate::webhook::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dashboard gateway v{}", env!("CARGO_PKG_VERSION"));

    let client = WebhookClient::new(config.webhook_timeout)?;
    let endpoints = &config.endpoints;
    info!(
        chat = %endpoints.chat,
        decision = %endpoints.decision,
        document = %endpoints.document,
        report = %endpoints.report,
        learning_plan = %endpoints.learning_plan,
        cv = %endpoints.cv,
        "Webhook endpoints resolved"
    );

    if config.fallback_to_simulated {
        warn!("Simulated-response fallback is ON: webhook outages will be masked");
    } else {
        info!("Simulated-response fallback is OFF: webhook failures surface as 502");
    }

    let facade = FeatureFacade::new(
        client,
        config.endpoints.clone(),
        config.fallback_to_simulated,
    );

    let state = AppState::new(config.clone(), facade);
    let _sweeper = state.sessions.spawn_sweeper(config.session_idle_ttl / 2);
    info!(
        idle_ttl_secs = config.session_idle_ttl.as_secs(),
        max_sessions = config.max_chat_sessions,
        "Chat session limits"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the dashboard origin once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
