//! Chat Routes - Conversation and Context Analysis

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use tomo::DomainError;

use crate::models::{ChatLogResponse, ChatRequest, ChatTurnResponse, SceneResponse};
use crate::{AppChatService, AppState};

const DEFAULT_HISTORY_LIMIT: usize = 50;

fn chat_service(state: &AppState) -> Result<&AppChatService, (StatusCode, String)> {
    state.chat_service.as_deref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "LLM provider is not configured".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Run one chat turn
#[utoipa::path(
    post,
    path = "/tomo/companion/{id}/chat",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Companion reply with refreshed scene", body = ChatTurnResponse),
        (status = 400, description = "Empty message"),
        (status = 404, description = "Companion not found"),
        (status = 502, description = "LLM call failed"),
        (status = 503, description = "LLM provider not configured")
    ),
    tag = "Chat"
)]
pub async fn chat_turn(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatTurnResponse>, (StatusCode, String)> {
    let service = chat_service(&state)?;

    let turn = service.chat(id, payload.message).await.map_err(|e| match e {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "Companion not found".to_string()),
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        DomainError::ExternalService(msg) => (StatusCode::BAD_GATEWAY, msg),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    Ok(Json(ChatTurnResponse {
        reply: turn.reply.into(),
        scene: turn.scene.into(),
        scene_updated: turn.scene_updated,
        analysis_error: turn.analysis_error,
        tokens_used: turn.usage.total_tokens,
    }))
}

/// Get chat history (newest first)
#[utoipa::path(
    get,
    path = "/tomo/companion/{id}/chats",
    params(
        ("id" = Uuid, Path, description = "Companion ID"),
        ("limit" = Option<usize>, Query, description = "Max messages to return")
    ),
    responses(
        (status = 200, description = "Chat history", body = Vec<ChatLogResponse>),
        (status = 503, description = "LLM provider not configured")
    ),
    tag = "Chat"
)]
pub async fn chat_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatLogResponse>>, (StatusCode, String)> {
    let service = chat_service(&state)?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let logs = service
        .history(id, limit)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

/// Forget all chat history for a companion
#[utoipa::path(
    delete,
    path = "/tomo/companion/{id}/chats",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    responses(
        (status = 200, description = "History removed"),
        (status = 503, description = "LLM provider not configured")
    ),
    tag = "Chat"
)]
pub async fn forget_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let service = chat_service(&state)?;

    let removed = service
        .forget(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "removed": removed
    })))
}

/// Recompute the scene from recent history
#[utoipa::path(
    post,
    path = "/tomo/companion/{id}/analyze",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    responses(
        (status = 200, description = "Refreshed scene", body = SceneResponse),
        (status = 404, description = "Companion not found"),
        (status = 502, description = "Analysis failed"),
        (status = 503, description = "LLM provider not configured")
    ),
    tag = "Chat"
)]
pub async fn analyze_scene(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SceneResponse>, (StatusCode, String)> {
    let service = chat_service(&state)?;

    let scene = service.analyze(id).await.map_err(|e| match e {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "Companion not found".to_string()),
        // Malformed model output is an upstream failure, not a client error
        DomainError::Validation(msg) | DomainError::ExternalService(msg) => {
            (StatusCode::BAD_GATEWAY, msg)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    Ok(Json(scene.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tomo/companion/:id/chat", post(chat_turn))
        .route(
            "/tomo/companion/:id/chats",
            get(chat_history).delete(forget_history),
        )
        .route("/tomo/companion/:id/analyze", post(analyze_scene))
}
