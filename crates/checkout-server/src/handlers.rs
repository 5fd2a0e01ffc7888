//! HTTP Handlers

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use checkout_core::ErrorEnvelope;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyError;
use crate::state::AppState;

/// Backend route issuing client tokens
const BACKEND_CLIENT_TOKEN_PATH: &str = "/venmo/client-token";

/// Backend route processing payments
const BACKEND_PROCESS_PAYMENT_PATH: &str = "/api/venmo/process-payment";

const SUCCESS_PAGE: &str = include_str!("../static/payment-success.html");

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend_configured: bool,
    pub public_backend_configured: bool,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorEnvelope::new(error))).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend_configured: state.config.backend_url.is_some(),
        public_backend_configured: state.config.public_backend_url.is_some(),
    })
}

/// Proxy `GET /venmo/client-token`, passing the body through unchanged
pub async fn client_token(State(state): State<AppState>) -> Response {
    match fetch_client_token(&state).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            tracing::error!("Error fetching client token: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate client token",
            )
        }
    }
}

async fn fetch_client_token(state: &AppState) -> Result<Value, ProxyError> {
    let base = state
        .config
        .public_backend_url
        .as_deref()
        .ok_or(ProxyError::MissingConfig("NEXT_PUBLIC_BACKEND_URL"))?;

    let response = state
        .http
        .get(format!("{base}{BACKEND_CLIENT_TOKEN_PATH}"))
        .header("Content-Type", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::UpstreamStatus(status));
    }

    Ok(response.json().await?)
}

/// Proxy `POST /api/venmo/process-payment` with the request body as-is
pub async fn process_payment(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(base) = state.config.backend_url.as_deref() else {
        let err = ProxyError::MissingConfig("BACKEND_URL");
        tracing::error!("Error processing payment: {}", err);
        return err.into_response();
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Rejecting payment payload: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON payload");
        }
    };

    match forward_payment(&state, base, &payload).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Error processing payment: {}", e);
            e.into_response()
        }
    }
}

async fn forward_payment(state: &AppState, base: &str, payload: &Value) -> Result<Response, ProxyError> {
    let response = state
        .http
        .post(format!("{base}{BACKEND_PROCESS_PAYMENT_PATH}"))
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    let data: Value = response.json().await?;

    if !status.is_success() {
        let error = data
            .get("error")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
            .unwrap_or("Payment processing failed");
        tracing::warn!(status = status.as_u16(), "Backend rejected payment: {}", error);
        return Ok(error_response(status, error));
    }

    Ok(Json(data).into_response())
}

/// Static confirmation page
pub async fn payment_success() -> Html<&'static str> {
    Html(SUCCESS_PAGE)
}
