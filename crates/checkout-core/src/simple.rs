//! Simplified Checkout
//!
//! A form-only flow with no hosted widget: it checks the payment service is
//! reachable, then treats every submission as a simulated success.

use std::sync::Arc;
use std::time::Duration;

use crate::controller::Navigator;
use crate::error::CheckoutError;
use crate::gateway::PaymentGateway;
use crate::model::{DEFAULT_AMOUNT, PaymentMethod, SUCCESS_PATH};

pub struct SimpleCheckout {
    gateway: Arc<dyn PaymentGateway>,
    navigator: Arc<dyn Navigator>,
    token_timeout: Duration,
    processing_delay: Duration,

    amount: String,
    method: PaymentMethod,
    loading: bool,
    processing: bool,
    development: bool,
    error_message: Option<String>,
}

impl SimpleCheckout {
    pub fn new(gateway: Arc<dyn PaymentGateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            gateway,
            navigator,
            token_timeout: Duration::from_secs(10),
            processing_delay: Duration::from_secs(1),
            amount: DEFAULT_AMOUNT.into(),
            method: PaymentMethod::default(),
            loading: false,
            processing: false,
            development: false,
            error_message: None,
        }
    }

    /// Probe the token endpoint; failure only flags development mode
    pub async fn mount(&mut self) {
        self.loading = true;
        self.error_message = None;

        let limit = self.token_timeout;
        let probe = match tokio::time::timeout(limit, self.gateway.fetch_client_token()).await {
            Ok(result) => result.map(drop),
            Err(_) => Err(CheckoutError::timeout("client token request", limit.as_secs())),
        };

        match probe {
            Ok(()) => self.development = false,
            Err(e) => {
                tracing::error!("Error fetching client token: {}", e);
                self.error_message = Some(format!("Failed to connect to payment service: {e}"));
                self.development = true;
            }
        }
        self.loading = false;
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn select_method(&mut self, method: PaymentMethod) {
        self.method = method;
    }

    /// Wait out the simulated processing time, then navigate straight away
    pub async fn submit(&mut self) {
        if self.processing {
            return;
        }
        self.processing = true;
        self.error_message = None;

        tokio::time::sleep(self.processing_delay).await;
        self.navigator.navigate(SUCCESS_PATH);

        self.processing = false;
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn is_processing(&self) -> bool {
        self.processing
    }

    pub const fn is_development(&self) -> bool {
        self.development
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::{ClientToken, PaymentReceipt, PaymentRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct Reachable(bool);

    #[async_trait]
    impl PaymentGateway for Reachable {
        async fn fetch_client_token(&self) -> Result<ClientToken> {
            if self.0 {
                Ok(ClientToken::new("tok"))
            } else {
                Err(CheckoutError::Network("connection refused".into()))
            }
        }

        async fn process_payment(&self, _request: &PaymentRequest) -> Result<PaymentReceipt> {
            panic!("simplified checkout never submits to the backend");
        }
    }

    #[derive(Default)]
    struct Visits(Mutex<Vec<String>>);

    impl Navigator for Visits {
        fn navigate(&self, path: &str) {
            self.0.lock().unwrap().push(path.to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_service_flags_development() {
        let mut checkout = SimpleCheckout::new(Arc::new(Reachable(false)), Arc::new(Visits::default()));
        checkout.mount().await;

        assert!(checkout.is_development());
        assert!(!checkout.is_loading());
        assert_eq!(
            checkout.error_message(),
            Some("Failed to connect to payment service: Network error: connection refused")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_navigates_after_delay() {
        let visits = Arc::new(Visits::default());
        let mut checkout = SimpleCheckout::new(Arc::new(Reachable(true)), visits.clone());
        checkout.mount().await;
        assert!(!checkout.is_development());

        let start = Instant::now();
        checkout.submit().await;

        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(*visits.0.lock().unwrap(), vec![SUCCESS_PATH.to_string()]);
        assert!(!checkout.is_processing());
    }
}
