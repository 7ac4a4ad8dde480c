use std::sync::Arc;
use std::time::Duration;

use axum::{extract::FromRef, middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod models;
mod routes;
mod services;

use adapters::{ChatCompletionsProvider, PgChatLogRepository, PgCompanionRepository, SdForgeClient};
use adapters::sd_forge::SdForgeConfig;
use application::{ChatService, CompanionService, ImageService};
use services::rate_limit::{FixedWindowLimiter, RateLimitConfig};

/// Type aliases for application services with concrete repository implementations
pub type AppCompanionService = CompanionService<PgCompanionRepository>;
pub type AppChatService = ChatService<PgCompanionRepository, PgChatLogRepository>;
pub type AppImageService = ImageService<PgCompanionRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub companion_service: Arc<AppCompanionService>,
    pub chat_service: Option<Arc<AppChatService>>,
    pub image_service: Option<Arc<AppImageService>>,
}

// Allow extracting PgPool directly from AppState
impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Tomo API is running - your companions are listening".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("Tomo API initializing...");

    // Initialize API key from secrets
    if let Some(api_key) = secrets.get("TOMO_API_KEY") {
        auth::init_api_key(api_key);
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("No TOMO_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Repositories
    let companion_repo = Arc::new(PgCompanionRepository::new(pool.clone()));
    let chat_log_repo = Arc::new(PgChatLogRepository::new(pool.clone()));

    let companion_service = Arc::new(CompanionService::new(companion_repo.clone()));

    // LLM provider (optional; chat routes answer 503 without it)
    let chat_service = match secrets.get("LLM_API_URL") {
        Some(url) => {
            let model = secrets
                .get("LLM_MODEL")
                .unwrap_or_else(|| "gpt-4o-mini".to_string());
            let provider = Arc::new(ChatCompletionsProvider::new(
                url,
                secrets.get("LLM_API_KEY"),
                model.clone(),
            ));
            tracing::info!("LLM provider initialized (model {})", model);
            Some(Arc::new(ChatService::new(
                companion_repo.clone(),
                chat_log_repo,
                provider,
            )))
        }
        None => {
            tracing::warn!("No LLM_API_URL set - chat disabled");
            None
        }
    };

    // SD Forge client (optional; image route returns a tagged failure without it)
    let image_service = match secrets.get("SD_API_URL") {
        Some(url) => {
            let mut config = SdForgeConfig::default();
            if let Some(secs) = secrets.get("SD_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
                config.request_timeout = Duration::from_secs(secs);
            }
            if let Some(retries) = secrets.get("SD_MAX_RETRIES").and_then(|s| s.parse().ok()) {
                config.max_retries = retries;
            }
            let generator = Arc::new(SdForgeClient::with_config(url, config));

            let mut limits = RateLimitConfig::default();
            if let Some(max) = secrets.get("RATE_LIMIT_MAX").and_then(|s| s.parse().ok()) {
                limits.max_requests = max;
            }
            if let Some(secs) = secrets
                .get("RATE_LIMIT_WINDOW_SECS")
                .and_then(|s| s.parse().ok())
            {
                limits.window = Duration::from_secs(secs);
            }
            let limiter = Arc::new(FixedWindowLimiter::new(Some(limits)));

            tracing::info!("SD Forge client initialized");
            Some(Arc::new(ImageService::new(
                companion_repo,
                generator,
                limiter,
            )))
        }
        None => {
            tracing::warn!("No SD_API_URL set - image generation disabled");
            None
        }
    };

    // Create application state
    let state = AppState {
        pool,
        companion_service,
        chat_service,
        image_service,
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::companion::router())
        .merge(routes::chat::router())
        .merge(routes::image::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    // Build router with shared state
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Tomo API ready");

    Ok(router.into())
}
