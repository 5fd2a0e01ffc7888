//! Proxy Error Types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use checkout_core::ErrorEnvelope;
use thiserror::Error;

/// Failures while forwarding to the payment backend
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Required backend URL is not configured
    #[error("{0} is not set")]
    MissingConfig(&'static str),

    /// Backend could not be reached
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {0}")]
    UpstreamStatus(StatusCode),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let error = if message.is_empty() {
            "An unexpected error occurred".to_string()
        } else {
            message
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorEnvelope::new(error))).into_response()
    }
}
