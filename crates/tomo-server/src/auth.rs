//! Simple API Key Authentication (Bearer Token)

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

/// API Key from environment/secrets
static API_KEY: std::sync::OnceLock<String> = std::sync::OnceLock::new();

/// Initialize the API key
pub fn init_api_key(key: String) {
    let _ = API_KEY.set(key);
}

/// Get the API key
fn get_api_key() -> Option<&'static str> {
    API_KEY.get().map(|s| s.as_str())
}

/// Extract the bearer token from request headers, if any
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Rate-limit key for the caller: the bearer token, or "anonymous" when
/// authentication is disabled.
pub fn user_key(headers: &HeaderMap) -> String {
    bearer_token(headers)
        .unwrap_or("anonymous")
        .to_string()
}

/// Authentication middleware
/// Validates Bearer token against the API key
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    // Get API key
    let api_key = match get_api_key() {
        Some(key) if !key.is_empty() => key,
        _ => {
            // No API key configured = auth disabled (for development)
            tracing::warn!("No API key configured, authentication disabled");
            return Ok(next.run(request).await);
        }
    };

    match bearer_token(request.headers()) {
        Some(token) if token == api_key => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API key attempted");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing or malformed Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
