//! Axum route handlers for the stateless feature endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::features::chat::AiResponse;
use crate::features::cv::CvOptimization;
use crate::features::decision::DecisionAnalysis;
use crate::features::document::{extract_document_text, DocumentAnalysis};
use crate::features::learning_plan::LearningPlan;
use crate::features::report::ReportAnalysis;
use crate::features::upload::UploadedFile;
use crate::models::message::ChatTurn;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub problem: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct LearningPlanRequest {
    pub skill: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRequest {
    pub cv_data: Value,
}

/// Rejects blank input; otherwise returns it trimmed, which is what gets forwarded.
fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/chat
///
/// One-shot chat over a caller-supplied history; no session state.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AiResponse>, AppError> {
    let last = request
        .messages
        .last()
        .ok_or_else(|| AppError::Validation("messages cannot be empty".to_string()))?;
    require_text("last message content", &last.content)?;

    Ok(Json(state.facade.send_chat(&request.messages).await?))
}

/// POST /api/v1/decisions/analyze
pub async fn handle_analyze_decision(
    State(state): State<AppState>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionAnalysis>, AppError> {
    let problem = require_text("problem", &request.problem)?;
    Ok(Json(state.facade.analyze_decision(problem).await?))
}

/// POST /api/v1/documents/analyze
pub async fn handle_analyze_document(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<DocumentAnalysis>, AppError> {
    let content = require_text("content", &request.content)?;
    Ok(Json(state.facade.analyze_document(content).await?))
}

/// POST /api/v1/documents/upload
///
/// Multipart `file` field; PDFs are converted to text before analysis.
pub async fn handle_upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DocumentAnalysis>, AppError> {
    let file = UploadedFile::from_multipart(multipart).await?;
    let content = extract_document_text(&file)?;
    Ok(Json(state.facade.analyze_document(&content).await?))
}

/// POST /api/v1/reports/analyze
///
/// Multipart `file` field, forwarded to the workflow as a base64 data URL.
pub async fn handle_analyze_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReportAnalysis>, AppError> {
    let file = UploadedFile::from_multipart(multipart).await?;
    Ok(Json(state.facade.analyze_report(&file).await?))
}

/// POST /api/v1/learning-plans
pub async fn handle_learning_plan(
    State(state): State<AppState>,
    Json(request): Json<LearningPlanRequest>,
) -> Result<Json<LearningPlan>, AppError> {
    let skill = require_text("skill", &request.skill)?;
    Ok(Json(state.facade.generate_learning_plan(skill).await?))
}

/// POST /api/v1/cv/optimize
pub async fn handle_optimize_cv(
    State(state): State<AppState>,
    Json(request): Json<CvRequest>,
) -> Result<Json<CvOptimization>, AppError> {
    if !request.cv_data.is_object() {
        return Err(AppError::Validation("cvData must be a JSON object".to_string()));
    }
    Ok(Json(state.facade.optimize_cv(&request.cv_data).await?))
}
