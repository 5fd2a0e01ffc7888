//! Payment Widget Integration
//!
//! Abstractions over the hosted drop-in widget. The controller only ever sees
//! [`WidgetFactory`] and [`WidgetInstance`], whether the real widget or the
//! development mock is active.

mod callback;
mod mock;

pub use callback::{CallbackWidgetFactory, CreateCallback, Promisified};
pub use mock::MockWidget;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{ClientToken, PaymentMethod};

/// A live widget coordinating payment-method UI and nonce generation
#[async_trait]
pub trait WidgetInstance: Send + Sync {
    /// Tokenize the selected payment method and return its nonce
    async fn request_payment_method(&self) -> Result<String>;

    /// Release the widget and its mount point
    async fn teardown(&self) -> Result<()>;
}

/// Creates widget instances from the hosted script (Strategy pattern)
#[async_trait]
pub trait WidgetFactory: Send + Sync {
    /// Create and mount a widget
    async fn create(&self, options: WidgetOptions) -> Result<Box<dyn WidgetInstance>>;

    /// Whether the mount point already holds rendered content
    fn container_has_content(&self, _container: &str) -> bool {
        false
    }

    /// Empty the mount point
    fn clear_container(&self, _container: &str) {}
}

/// Card section configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOptions {
    pub flow: String,
}

/// Venmo section configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenmoOptions {
    pub allow_new_browser_tab: bool,
}

/// PayPal section configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaypalOptions {
    pub flow: String,
}

/// Options handed to the widget constructor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    pub authorization: String,
    pub container: String,
    pub card: CardOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venmo: Option<VenmoOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal: Option<PaypalOptions>,
}

impl WidgetOptions {
    const VAULT: &'static str = "vault";

    /// Build the constructor options for the selected method
    pub fn for_method(token: &ClientToken, container: &str, method: PaymentMethod) -> Self {
        let (venmo, paypal) = match method {
            PaymentMethod::Venmo => (
                Some(VenmoOptions {
                    allow_new_browser_tab: false,
                }),
                None,
            ),
            PaymentMethod::Paypal => (
                None,
                Some(PaypalOptions {
                    flow: Self::VAULT.into(),
                }),
            ),
        };

        Self {
            authorization: token.as_str().to_string(),
            container: container.to_string(),
            card: CardOptions {
                flow: Self::VAULT.into(),
            },
            venmo,
            paypal,
        }
    }

    /// Which method these options were built for
    pub const fn method(&self) -> PaymentMethod {
        if self.paypal.is_some() {
            PaymentMethod::Paypal
        } else {
            PaymentMethod::Venmo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_venmo_options() {
        let options = WidgetOptions::for_method(
            &ClientToken::new("tok"),
            "dropin-container",
            PaymentMethod::Venmo,
        );
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "authorization": "tok",
                "container": "dropin-container",
                "card": {"flow": "vault"},
                "venmo": {"allowNewBrowserTab": false},
            })
        );
        assert_eq!(options.method(), PaymentMethod::Venmo);
    }

    #[test]
    fn test_paypal_options() {
        let options = WidgetOptions::for_method(
            &ClientToken::new("tok"),
            "dropin-container",
            PaymentMethod::Paypal,
        );
        assert!(options.venmo.is_none());
        assert_eq!(options.paypal, Some(PaypalOptions { flow: "vault".into() }));
        assert_eq!(options.method(), PaymentMethod::Paypal);
    }
}
