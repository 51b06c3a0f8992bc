use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use std::sync::Arc;

use crate::{dto::ErrorResponse, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Lets the request through only when `x-api-key` equals the configured key.
///
/// Missing and wrong keys get the same 401 answer. With no key configured
/// every request is refused.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|value| value.as_bytes());

    let authorized = match (provided, state.config.api_key.as_deref()) {
        (Some(provided), Some(expected)) => provided == expected.as_bytes(),
        _ => false,
    };

    if !authorized {
        tracing::warn!(
            "Rejected request to {}: invalid or missing API key",
            request.uri().path()
        );
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("API Key inválida o faltante")),
        )
            .into_response();
    }

    next.run(request).await
}
