//! # checkout-core
//!
//! Client-side checkout logic for venmo-checkout: the payment widget
//! lifecycle, the page controller driving it, and the gateway to the
//! backend proxy.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PaymentController                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │ PaymentGateway │  │ WidgetFactory  │  │   Navigator    │  │
//! │  │  (Strategy)    │  │  (Strategy)    │  │                │  │
//! │  └────────────────┘  └────────────────┘  └────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The hosted widget script and the backend are injected, so the controller
//! runs unchanged against the real services, the development mock, or tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::{HttpGateway, Identity, PaymentController, Promisified};
//!
//! let mut controller = PaymentController::new(
//!     Arc::new(HttpGateway::from_env()),
//!     Arc::new(Promisified::new(dropin)),
//!     navigator,
//!     Identity::placeholder(),
//! );
//!
//! controller.mount().await;
//! controller.script_loaded().await;
//! controller.set_amount("25.00");
//! controller.submit().await;
//! ```

pub mod controller;
pub mod error;
pub mod gateway;
pub mod model;
pub mod simple;
pub mod widget;

pub use controller::{ControllerConfig, Liveness, Navigator, PaymentController, Phase, ScriptStatus};
pub use error::{CheckoutError, Result};
pub use gateway::{HttpGateway, PaymentGateway};
pub use model::{
    ClientToken, ErrorEnvelope, Identity, PaymentMethod, PaymentOutcome, PaymentReceipt,
    PaymentRequest,
};
pub use simple::SimpleCheckout;
pub use widget::{MockWidget, Promisified, WidgetFactory, WidgetInstance, WidgetOptions};
