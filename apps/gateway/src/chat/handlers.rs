//! Axum route handlers for chat sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::chat::send_message;
use crate::chat::session::{SendOutcome, SessionSnapshot};
use crate::chat::store::SharedSession;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyResponse {
    pub message_id: String,
    pub content: String,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Chat session {id} not found")))
}

/// POST /api/v1/chat/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let session = state.sessions.create().await;
    let snapshot = session
        .lock()
        .await
        .snapshot(Instant::now(), state.config.copy_indicator_ttl);
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/v1/chat/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    let snapshot = session
        .lock()
        .await
        .snapshot(Instant::now(), state.config.copy_indicator_ttl);
    Ok(Json(snapshot))
}

/// DELETE /api/v1/chat/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Chat session {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/chat/sessions/:id/messages
///
/// Blank input and sends during a pending reply are reported as `ignored`,
/// not as errors.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendOutcome>, AppError> {
    let session = find_session(&state, id).await?;
    let outcome = send_message(session, state.assistant.clone(), &request.content).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/chat/sessions/:id/messages/:message_id/copy
pub async fn handle_copy_message(
    State(state): State<AppState>,
    Path((id, message_id)): Path<(Uuid, String)>,
) -> Result<Json<CopyResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    let message = guard.copy(&message_id, Instant::now())?;
    Ok(Json(CopyResponse {
        message_id: message.id.clone(),
        content: message.content.clone(),
    }))
}
