//! Image Routes - Companion Image Generation
//!
//! Generation failures come back as a tagged `{success, image?, error?}`
//! body with HTTP 200; only auth (401), rate limiting (429), and unknown
//! companions (404) use error statuses.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use tomo::{DomainError, GenerationRequest};

use crate::auth;
use crate::models::{ImageRequest, ImageResponse};
use crate::AppState;

/// Generate an image of a companion
#[utoipa::path(
    post,
    path = "/tomo/companion/{id}/image",
    params(
        ("id" = Uuid, Path, description = "Companion ID")
    ),
    request_body = ImageRequest,
    responses(
        (status = 200, description = "Tagged generation result", body = ImageResponse),
        (status = 400, description = "Invalid art style"),
        (status = 404, description = "Companion not found"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "Image"
)]
pub async fn generate_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, (StatusCode, String)> {
    let Some(service) = state.image_service.as_deref() else {
        return Ok(Json(ImageResponse::failed(
            "Image generation is not configured",
        )));
    };

    let style = payload
        .style
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;

    let request = GenerationRequest {
        prompt: payload.prompt,
        negative_prompt: payload.negative_prompt,
        style,
        steps: payload.steps,
        cfg_scale: payload.cfg_scale,
        width: payload.width,
        height: payload.height,
        seed: payload.seed,
    };

    let user = auth::user_key(&headers);
    match service
        .generate(&user, id, request, payload.use_scene_tags)
        .await
    {
        Ok(image) => Ok(Json(ImageResponse::ok(image.data_uri))),
        Err(DomainError::RateLimited(message)) => Err((StatusCode::TOO_MANY_REQUESTS, message)),
        Err(DomainError::NotFound { .. }) => {
            Err((StatusCode::NOT_FOUND, "Companion not found".to_string()))
        }
        Err(DomainError::ExternalService(message)) => Ok(Json(ImageResponse::failed(message))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tomo/companion/:id/image", post(generate_image))
}
