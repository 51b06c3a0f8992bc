use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use chrono::{SecondsFormat, Utc};

use std::sync::Arc;

use crate::{
    dto::{ContactRequest, DemoRequest, ErrorResponse, HealthResponse},
    service::SubmissionError,
    state::AppState,
};

#[debug_handler]
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(&rejection),
    };

    match state.service.send_contact(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(e) => submission_error("Error enviando email", &e),
    }
}

#[debug_handler]
pub async fn request_demo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DemoRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(&rejection),
    };

    match state.service.request_demo(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(e) => submission_error("Error procesando solicitud de demo", &e),
    }
}

#[debug_handler]
pub async fn health_check() -> Response {
    let body = HealthResponse {
        success: true,
        message: "API funcionando correctamente".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint no encontrado")),
    )
        .into_response()
}

fn bad_body(rejection: &JsonRejection) -> Response {
    tracing::warn!("Rejected request body: {rejection}");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(rejection.body_text())),
    )
        .into_response()
}

fn submission_error(context: &str, e: &SubmissionError) -> Response {
    match e {
        SubmissionError::Validation(_) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        SubmissionError::Delivery(_) => {
            tracing::error!("{context}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
