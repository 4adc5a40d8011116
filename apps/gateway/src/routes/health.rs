use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, fallback mode, and the number of live chat sessions.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "dashboard-gateway",
        "fallbackToSimulated": state.facade.fallback_to_simulated(),
        "chatSessions": state.sessions.len().await
    }))
}
