//! Mock Widget
//!
//! Stands in for the hosted widget in development mode. Never touches the
//! network and never fails.

use async_trait::async_trait;

use super::WidgetInstance;
use crate::error::Result;
use crate::model::MOCK_NONCE;

/// Development-mode widget with a fixed nonce
#[derive(Clone, Debug, Default)]
pub struct MockWidget;

impl MockWidget {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WidgetInstance for MockWidget {
    async fn request_payment_method(&self) -> Result<String> {
        tracing::debug!("Mock payment method requested");
        Ok(MOCK_NONCE.to_string())
    }

    async fn teardown(&self) -> Result<()> {
        tracing::debug!("Mock instance teardown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_widget() {
        let widget = MockWidget::new();
        assert_eq!(widget.request_payment_method().await.unwrap(), MOCK_NONCE);
        assert!(widget.teardown().await.is_ok());
    }
}
