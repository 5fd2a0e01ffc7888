//! Checkout Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout error types
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Request rejected before a response arrived, or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Body could not be parsed, or a required field was missing
    #[error("{0}")]
    Payload(String),

    /// Hosted widget script failed to load, or the widget reported an error
    #[error("Widget error: {0}")]
    Widget(String),

    /// Backend answered without a success indicator
    #[error("{0}")]
    Declined(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// Build a timeout error for an operation bounded by `secs`
    pub fn timeout(what: &str, secs: u64) -> Self {
        Self::Network(format!("{what} timed out after {secs}s"))
    }

    /// HTTP status carried by this error, if any
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the payment service.",
            Self::Http { .. } => "The payment service returned an error.",
            Self::Payload(_) => "The payment service sent an unexpected response.",
            Self::Widget(_) => "Failed to load payment interface.",
            Self::Declined(_) => "Payment was not successful.",
            Self::Config(_) => "Service configuration error.",
        }
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Payload(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_message_only() {
        let err = CheckoutError::Http {
            status: 502,
            message: "Server returned 502".into(),
        };
        assert_eq!(err.to_string(), "Server returned 502");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_timeout_is_network_error() {
        let err = CheckoutError::timeout("client token request", 10);
        assert!(matches!(err, CheckoutError::Network(_)));
        assert_eq!(
            err.to_string(),
            "Network error: client token request timed out after 10s"
        );
    }

    #[test]
    fn test_json_error_is_payload() {
        let err: CheckoutError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, CheckoutError::Payload(_)));
        assert_eq!(err.user_message(), "The payment service sent an unexpected response.");
    }
}
