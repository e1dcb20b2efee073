//! Request middleware: API-key auth and request logging

use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests without a valid API key when auth is enabled
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let security = &state.config.security;
    if !security.enable_auth {
        return Ok(next.run(request).await);
    }

    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if supplied.is_empty() {
        return Err(ApiError::unauthorized("API key is required"));
    }
    if !security.api_keys.iter().any(|key| key == supplied) {
        return Err(ApiError::unauthorized("Invalid API key"));
    }

    Ok(next.run(request).await)
}

/// Log method, path, status and elapsed time for every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        %request_id,
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}
