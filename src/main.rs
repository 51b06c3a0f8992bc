use contact_relay::{app, config, mailer::ResendMailer, state::AppState};

use tracing_subscriber::EnvFilter;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {e}");
        panic!("failed to load configuration: {e}");
    });

    if cfg.has_api_key() {
        tracing::info!("API key: configured");
    } else {
        tracing::warn!("API key: NOT CONFIGURED, submission endpoints will reject every request");
    }
    if cfg.has_resend_api_key() {
        tracing::info!("Resend API key: configured");
    } else {
        tracing::warn!("Resend API key: NOT CONFIGURED, email delivery will fail");
    }

    // Setup service
    let mailer = Arc::new(ResendMailer::new(
        cfg.resend_base_url.clone(),
        cfg.resend_api_key.clone(),
    ));
    let port = cfg.port;
    let state = Arc::new(AppState::new(cfg, mailer));

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {port}: {e}");
            panic!("failed to bind to port {port}: {e}");
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Contact relay starting, listening on {}", addr),
        Err(_) => tracing::info!("Contact relay starting on port {}", port),
    }

    axum::serve(listener, app(state))
        .await
        .expect("Failed to start server");
}
