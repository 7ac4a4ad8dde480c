//! Companion Routes - Profile and Scene Management
//!
//! HTTP handlers that delegate to CompanionService for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use tomo::ArtStyle;

use crate::models::{
    CompanionResponse, CreateCompanionRequest, SceneResponse, UpdateCompanionRequest,
};
use crate::AppState;

/// Parse an optional style string from a request body
fn parse_style(style: Option<&str>) -> Result<Option<ArtStyle>, (StatusCode, String)> {
    style
        .map(|s| s.parse::<ArtStyle>())
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))
}

/// List all companions
#[utoipa::path(
    get,
    path = "/tomo/companion",
    responses(
        (status = 200, description = "List of all companions", body = Vec<CompanionResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn list_companions(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanionResponse>>, (StatusCode, String)> {
    let results = state
        .companion_service
        .list_all()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let responses = results
        .into_iter()
        .map(|(companion, scene)| CompanionResponse::from_pair(companion, scene))
        .collect();

    Ok(Json(responses))
}

/// Create new companion
#[utoipa::path(
    post,
    path = "/tomo/companion",
    request_body = CreateCompanionRequest,
    responses(
        (status = 200, description = "Companion created successfully", body = CompanionResponse),
        (status = 400, description = "Invalid art style"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn create_companion(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanionRequest>,
) -> Result<Json<CompanionResponse>, (StatusCode, String)> {
    let art_style = parse_style(payload.art_style.as_deref())?;

    let (companion, scene) = state
        .companion_service
        .create(
            payload.name,
            payload.persona,
            payload.appearance,
            payload.user_name,
            payload.header_image_url,
            art_style,
        )
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(CompanionResponse::from_pair(companion, scene)))
}

/// Get companion by ID
#[utoipa::path(
    get,
    path = "/tomo/companion/{id}",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    responses(
        (status = 200, description = "Companion found", body = CompanionResponse),
        (status = 404, description = "Companion not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn get_companion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanionResponse>, (StatusCode, String)> {
    let (companion, scene) = state
        .companion_service
        .get_by_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "Companion not found".to_string()))?;

    Ok(Json(CompanionResponse::from_pair(companion, scene)))
}

/// Update companion
#[utoipa::path(
    put,
    path = "/tomo/companion/{id}",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    request_body = UpdateCompanionRequest,
    responses(
        (status = 200, description = "Companion updated successfully", body = CompanionResponse),
        (status = 400, description = "Invalid art style"),
        (status = 404, description = "Companion not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn update_companion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanionRequest>,
) -> Result<Json<CompanionResponse>, (StatusCode, String)> {
    let art_style = parse_style(payload.art_style.as_deref())?;

    let (companion, scene) = state
        .companion_service
        .update(
            id,
            payload.name,
            payload.persona,
            payload.appearance,
            payload.user_name,
            payload.header_image_url,
            art_style,
        )
        .await
        .map_err(|e| match e {
            tomo::DomainError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "Companion not found".to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(CompanionResponse::from_pair(companion, scene)))
}

/// Delete companion
#[utoipa::path(
    delete,
    path = "/tomo/companion/{id}",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    responses(
        (status = 200, description = "Companion deleted successfully"),
        (status = 404, description = "Companion not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn delete_companion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let deleted = state
        .companion_service
        .delete(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Companion not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Companion deleted"
    })))
}

/// Get companion scene
#[utoipa::path(
    get,
    path = "/tomo/companion/{id}/scene",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    responses(
        (status = 200, description = "Scene found", body = SceneResponse),
        (status = 404, description = "Scene not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn get_scene(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SceneResponse>, (StatusCode, String)> {
    let scene = state
        .companion_service
        .get_scene(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "Scene not found".to_string()))?;

    Ok(Json(scene.into()))
}

/// Wipe companion scene back to defaults
#[utoipa::path(
    delete,
    path = "/tomo/companion/{id}/scene",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    responses(
        (status = 200, description = "Scene reset to defaults", body = SceneResponse),
        (status = 404, description = "Scene not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Companion"
)]
pub async fn wipe_scene(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SceneResponse>, (StatusCode, String)> {
    let scene = state
        .companion_service
        .wipe_scene(id)
        .await
        .map_err(|e| match e {
            tomo::DomainError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "Scene not found".to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(scene.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tomo/companion", get(list_companions).post(create_companion))
        .route(
            "/tomo/companion/:id",
            get(get_companion)
                .put(update_companion)
                .delete(delete_companion),
        )
        .route(
            "/tomo/companion/:id/scene",
            get(get_scene).delete(wipe_scene),
        )
}
