//! Checkout Domain Model
//!
//! Transient session state shared by the controller, the gateway and the
//! proxy. Nothing here is persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// Amount shown in the form before the user edits it
pub const DEFAULT_AMOUNT: &str = "10.00";

/// Nonce reported by the mock widget in development mode
pub const MOCK_NONCE: &str = "mock-payment-method-nonce";

/// Confirmation page the controller redirects to after a successful payment
pub const SUCCESS_PATH: &str = "/payment-success";

/// Opaque credential authorizing the hosted widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientToken(String);

impl ClientToken {
    const DEVELOPMENT: &'static str = "mock_client_token_for_development";

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Placeholder used when the real token could not be fetched
    pub fn development() -> Self {
        Self(Self::DEVELOPMENT.into())
    }

    pub fn is_development(&self) -> bool {
        self.0 == Self::DEVELOPMENT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wire shape of `GET /api/client-token`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTokenResponse {
    #[serde(default)]
    pub client_token: Option<String>,
}

/// Payment method offered by the widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Venmo,
    Paypal,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Venmo => "venmo",
            Self::Paypal => "paypal",
        }
    }

    /// Label shown in the method picker
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Venmo => "Venmo",
            Self::Paypal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "venmo" => Ok(Self::Venmo),
            "paypal" => Ok(Self::Paypal),
            other => Err(CheckoutError::Config(format!("unknown payment method: {other}"))),
        }
    }
}

/// Result of the most recent submission
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    #[default]
    Idle,
    Success,
    Error,
}

/// Who is paying, and for what
///
/// Supplied by an auth/session layer outside this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub membership_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, membership_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            membership_id: membership_id.into(),
        }
    }

    /// Fixed ids used until a real session is wired in
    pub fn placeholder() -> Self {
        Self::new("67cbfb264a1df012485244c6", "67ce716b2e7c3e697e2d9d7f")
    }
}

/// Body posted to `/api/process-payment`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_method_nonce: String,
    pub amount: String,
    pub user_id: String,
    pub membership_id: String,
    pub payment_method: PaymentMethod,
}

impl PaymentRequest {
    pub fn new(
        nonce: impl Into<String>,
        amount: impl Into<String>,
        identity: &Identity,
        method: PaymentMethod,
    ) -> Self {
        Self {
            payment_method_nonce: nonce.into(),
            amount: amount.into(),
            user_id: identity.user_id.clone(),
            membership_id: identity.membership_id.clone(),
            payment_method: method,
        }
    }
}

/// Backend response to a payment submission, kept verbatim
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReceipt(pub serde_json::Value);

impl PaymentReceipt {
    /// The backend signals success with `status: "success"` or a transaction object
    pub fn is_successful(&self) -> bool {
        let status_ok = self.0.get("status").and_then(|s| s.as_str()) == Some("success");
        let has_transaction = self
            .0
            .get("transaction")
            .is_some_and(|t| !t.is_null() && t != &serde_json::Value::Bool(false));
        status_ok || has_transaction
    }
}

/// Uniform `{error}` body used by every failing proxy response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_request_wire_shape() {
        let request = PaymentRequest::new(
            "nonce-1",
            "25.00",
            &Identity::placeholder(),
            PaymentMethod::Venmo,
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "paymentMethodNonce": "nonce-1",
                "amount": "25.00",
                "userId": "67cbfb264a1df012485244c6",
                "membershipId": "67ce716b2e7c3e697e2d9d7f",
                "paymentMethod": "venmo",
            })
        );
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("PayPal".parse::<PaymentMethod>().unwrap(), PaymentMethod::Paypal);
        assert_eq!("venmo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Venmo);
        assert!("card".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::default(), PaymentMethod::Venmo);
        assert_eq!(PaymentMethod::Paypal.display_name(), "PayPal");
        assert_eq!(PaymentMethod::Venmo.to_string(), "venmo");
    }

    #[test]
    fn test_receipt_success_indicators() {
        assert!(PaymentReceipt(json!({"status": "success"})).is_successful());
        assert!(PaymentReceipt(json!({"transaction": {"id": "t1"}})).is_successful());
        assert!(!PaymentReceipt(json!({"status": "failed"})).is_successful());
        assert!(!PaymentReceipt(json!({"transaction": null})).is_successful());
        assert!(!PaymentReceipt(json!({})).is_successful());
    }

    #[test]
    fn test_development_token() {
        let token = ClientToken::development();
        assert!(token.is_development());
        assert_eq!(token.as_str(), "mock_client_token_for_development");
        assert!(!ClientToken::new("real").is_development());
    }

    #[test]
    fn test_token_response_tolerates_missing_field() {
        let body: ClientTokenResponse = serde_json::from_value(json!({"other": 1})).unwrap();
        assert!(body.client_token.is_none());
    }
}
