//! Checkout API Gateway
//!
//! The controller talks to the payment backend only through
//! [`PaymentGateway`], so tests and alternative transports can be swapped in.
//! [`HttpGateway`] is the production implementation and targets the proxy
//! routes served by `checkout-server`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{CheckoutError, Result};
use crate::model::{ClientToken, ClientTokenResponse, PaymentReceipt, PaymentRequest};

/// Proxy route issuing client tokens
pub const CLIENT_TOKEN_PATH: &str = "/api/client-token";

/// Proxy route accepting payment submissions
pub const PROCESS_PAYMENT_PATH: &str = "/api/process-payment";

/// Payment backend seam (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Obtain a client token for the hosted widget
    async fn fetch_client_token(&self) -> Result<ClientToken>;

    /// Submit a tokenized payment
    async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt>;
}

/// reqwest-backed gateway
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create from `CHECKOUT_API_URL`, defaulting to the local server
    pub fn from_env() -> Self {
        let base_url = std::env::var("CHECKOUT_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn fetch_client_token(&self) -> Result<ClientToken> {
        let url = self.url(CLIENT_TOKEN_PATH);
        tracing::debug!(%url, "Fetching client token");

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            tracing::error!(status = status.as_u16(), body = %text, "Backend response error");
            return Err(CheckoutError::Http {
                status: status.as_u16(),
                message: format!("Backend returned {}: {}", status.as_u16(), text),
            });
        }

        let body: ClientTokenResponse = response.json().await?;
        match body.client_token {
            Some(token) if !token.is_empty() => {
                tracing::debug!(length = token.len(), "Client token received");
                Ok(ClientToken::new(token))
            }
            _ => Err(CheckoutError::Payload(
                "No client token received from server".into(),
            )),
        }
    }

    async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt> {
        let url = self.url(PROCESS_PAYMENT_PATH);
        tracing::debug!(%url, method = %request.payment_method, "Processing payment");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        let receipt: PaymentReceipt = response.json().await?;
        tracing::debug!(receipt = %receipt.0, "Payment result");

        if receipt.is_successful() {
            Ok(receipt)
        } else {
            Err(CheckoutError::Declined("Payment was not successful".into()))
        }
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> CheckoutError {
    let body: serde_json::Value = response.json().await.unwrap_or_default();
    let message = body
        .get("error")
        .and_then(|e| e.as_str())
        .filter(|e| !e.is_empty())
        .map_or_else(|| format!("Server returned {}", status.as_u16()), str::to_string);

    CheckoutError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Identity, PaymentMethod};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> PaymentRequest {
        PaymentRequest::new("nonce", "25.00", &Identity::placeholder(), PaymentMethod::Venmo)
    }

    #[tokio::test]
    async fn test_fetch_client_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CLIENT_TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"clientToken": "tok_123"})))
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(server.uri());
        let token = gateway.fetch_client_token().await.unwrap();
        assert_eq!(token.as_str(), "tok_123");
    }

    #[tokio::test]
    async fn test_client_token_non_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CLIENT_TOKEN_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = HttpGateway::new(server.uri()).fetch_client_token().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Backend returned 500: boom");
    }

    #[tokio::test]
    async fn test_client_token_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CLIENT_TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "x"})))
            .mount(&server)
            .await;

        let err = HttpGateway::new(server.uri()).fetch_client_token().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Payload(_)));
        assert_eq!(err.to_string(), "No client token received from server");
    }

    #[tokio::test]
    async fn test_client_token_unreachable() {
        // Nothing listens on port 9 locally
        let err = HttpGateway::new("http://127.0.0.1:9")
            .fetch_client_token()
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Network(_)));
    }

    #[tokio::test]
    async fn test_process_payment_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROCESS_PAYMENT_PATH))
            .and(body_json(json!({
                "paymentMethodNonce": "nonce",
                "amount": "25.00",
                "userId": "67cbfb264a1df012485244c6",
                "membershipId": "67ce716b2e7c3e697e2d9d7f",
                "paymentMethod": "venmo",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = HttpGateway::new(server.uri())
            .process_payment(&request())
            .await
            .unwrap();
        assert!(receipt.is_successful());
    }

    #[tokio::test]
    async fn test_process_payment_backend_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROCESS_PAYMENT_PATH))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({"error": "Card declined"})))
            .mount(&server)
            .await;

        let err = HttpGateway::new(server.uri())
            .process_payment(&request())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(402));
        assert_eq!(err.to_string(), "Card declined");
    }

    #[tokio::test]
    async fn test_process_payment_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROCESS_PAYMENT_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = HttpGateway::new(server.uri())
            .process_payment(&request())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Server returned 503");
    }

    #[tokio::test]
    async fn test_process_payment_without_success_indicator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROCESS_PAYMENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
            .mount(&server)
            .await;

        let err = HttpGateway::new(server.uri())
            .process_payment(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Declined(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:3000/");
        assert_eq!(gateway.url(CLIENT_TOKEN_PATH), "http://localhost:3000/api/client-token");
    }
}
