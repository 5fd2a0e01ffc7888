//! venmo-checkout HTTP Server
//!
//! Axum-based proxy between the checkout page and the payment backend,
//! plus the static confirmation page.

mod config;
mod error;
mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::handlers::{client_token, health_check, payment_success, process_payment};
use crate::state::AppState;

/// Build the application router
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Backend proxy
        .route("/api/client-token", get(client_token))
        .route("/api/process-payment", post(process_payment))

        // Confirmation page
        .route("/payment-success", get(payment_success))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    match &config.public_backend_url {
        Some(url) => tracing::info!("✓ Client token backend: {}", url),
        None => tracing::warn!("⚠ NEXT_PUBLIC_BACKEND_URL not set - client tokens will fail"),
    }
    match &config.backend_url {
        Some(url) => tracing::info!("✓ Payment backend: {}", url),
        None => tracing::warn!("⚠ BACKEND_URL not set - payments will fail"),
    }
    if config.backends_diverge() {
        tracing::warn!("⚠ BACKEND_URL and NEXT_PUBLIC_BACKEND_URL point at different backends");
    }

    let addr = config.bind_addr.clone();
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - Health check");
    tracing::info!("  GET  /api/client-token    - Issue widget client token");
    tracing::info!("  POST /api/process-payment - Submit payment nonce");
    tracing::info!("  GET  /payment-success     - Confirmation page");
    tracing::info!("");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
