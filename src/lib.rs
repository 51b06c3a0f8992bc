pub mod auth;
pub mod config;
pub mod dto;
pub mod handler;
pub mod mailer;
pub mod service;
pub mod state;
pub mod template;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::state::AppState;

/// Builds the HTTP router. Only the two submission routes sit behind the
/// API key; everything unmatched, including wrong methods, answers 404.
pub fn app(state: Arc<AppState>) -> Router {
    let api_key = middleware::from_fn_with_state(state.clone(), auth::require_api_key);

    Router::new()
        .route(
            "/send-email",
            post(handler::send_email)
                .route_layer(api_key.clone())
                .fallback(handler::not_found),
        )
        .route(
            "/request-demo",
            post(handler::request_demo)
                .route_layer(api_key)
                .fallback(handler::not_found),
        )
        .route(
            "/health",
            get(handler::health_check).fallback(handler::not_found),
        )
        .fallback(handler::not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
