//! Payment Page Controller
//!
//! Drives the checkout lifecycle: token fetch, widget initialization,
//! submission, and the redirect to the confirmation page.
//!
//! ```text
//! Uninitialized ─▶ TokenPending ─┬─▶ WidgetLoading ─▶ WidgetReady ─▶ SubmittingPayment ─┬─▶ Success
//!                                │          │                                            └─▶ Error
//!                                │          └─▶ ScriptError (terminal)
//!                                └─▶ DevelopmentFallback ─▶ SubmittingPayment ─▶ ...
//! ```
//!
//! All methods take `&mut self`, so steps are sequenced by the caller's event
//! loop. The current widget is only replaced after its predecessor's teardown
//! has settled, which keeps at most one instance live.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{CheckoutError, Result};
use crate::gateway::PaymentGateway;
use crate::model::{
    ClientToken, DEFAULT_AMOUNT, Identity, MOCK_NONCE, PaymentMethod, PaymentOutcome,
    PaymentRequest, SUCCESS_PATH,
};
use crate::widget::{MockWidget, WidgetFactory, WidgetInstance, WidgetOptions};

/// Notice shown while the mock widget is active
pub const DEVELOPMENT_NOTICE: &str = "Using development mode due to connection error";

/// Error shown when submit is attempted with no widget
pub const NOT_INITIALIZED: &str = "Payment system not initialized";

/// Performs client-side navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Shared view liveness
///
/// Cloned out of the controller so the hosting view can mark itself gone
/// while an event is still awaiting; results that land afterwards are dropped.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the view as gone
    pub fn mark_gone(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Timing and mount-point configuration
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Upper bound on the client token request
    pub token_timeout: Duration,

    /// Upper bound on the payment submission request
    pub payment_timeout: Duration,

    /// Pause before creating the widget so the mount point is in place
    pub settle_delay: Duration,

    /// Simulated processing time in development mode
    pub simulated_processing: Duration,

    /// How long the success view is shown before redirecting
    pub redirect_delay: Duration,

    /// Mount point id handed to the widget
    pub container: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            token_timeout: Duration::from_secs(10),
            payment_timeout: Duration::from_secs(15),
            settle_delay: Duration::from_millis(100),
            simulated_processing: Duration::from_secs(1),
            redirect_delay: Duration::from_secs(2),
            container: "dropin-container".into(),
        }
    }
}

/// Load state of the hosted widget script
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptStatus {
    Pending,
    Loaded,
    Failed(String),
}

/// What the page is currently showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    TokenPending,
    WidgetLoading,
    WidgetReady,
    SubmittingPayment,
    Success,
    Error,
    DevelopmentFallback,
    ScriptError,
}

/// Checkout page state machine
pub struct PaymentController {
    session_id: Uuid,
    gateway: Arc<dyn PaymentGateway>,
    factory: Arc<dyn WidgetFactory>,
    navigator: Arc<dyn Navigator>,
    identity: Identity,
    config: ControllerConfig,

    mounted: bool,
    loading: bool,
    client_token: Option<ClientToken>,
    development: bool,
    development_notice: Option<String>,
    script: ScriptStatus,
    widget_error: Option<String>,
    instance: Option<Box<dyn WidgetInstance>>,

    amount: String,
    method: PaymentMethod,
    processing: bool,
    outcome: PaymentOutcome,
    error_message: Option<String>,

    alive: Liveness,
    redirect: Option<JoinHandle<()>>,
}

impl PaymentController {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        factory: Arc<dyn WidgetFactory>,
        navigator: Arc<dyn Navigator>,
        identity: Identity,
    ) -> Self {
        Self::with_config(gateway, factory, navigator, identity, ControllerConfig::default())
    }

    pub fn with_config(
        gateway: Arc<dyn PaymentGateway>,
        factory: Arc<dyn WidgetFactory>,
        navigator: Arc<dyn Navigator>,
        identity: Identity,
        config: ControllerConfig,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            gateway,
            factory,
            navigator,
            identity,
            config,
            mounted: false,
            loading: false,
            client_token: None,
            development: false,
            development_notice: None,
            script: ScriptStatus::Pending,
            widget_error: None,
            instance: None,
            amount: DEFAULT_AMOUNT.into(),
            method: PaymentMethod::default(),
            processing: false,
            outcome: PaymentOutcome::Idle,
            error_message: None,
            alive: Liveness::new(),
            redirect: None,
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Fetch the client token, falling back to development mode on any failure
    pub async fn mount(&mut self) {
        if self.mounted || !self.is_alive() {
            return;
        }
        self.mounted = true;
        self.loading = true;
        self.error_message = None;

        tracing::debug!(session = %self.session_id, "Fetching client token");

        let limit = self.config.token_timeout;
        let fetched = match tokio::time::timeout(limit, self.gateway.fetch_client_token()).await {
            Ok(result) => result,
            Err(_) => Err(CheckoutError::timeout("client token request", limit.as_secs())),
        };

        self.loading = false;

        if !self.is_alive() {
            tracing::debug!(session = %self.session_id, "View gone, token result dropped");
            return;
        }

        match fetched {
            Ok(token) => {
                tracing::debug!(session = %self.session_id, "Client token received");
                self.client_token = Some(token);
                self.development = false;
            }
            Err(e) => {
                tracing::error!(session = %self.session_id, "Error fetching client token: {}", e);
                self.enter_development_mode(&e);
            }
        }

        self.initialize_widget().await;
    }

    /// The hosted script finished loading
    pub async fn script_loaded(&mut self) {
        if matches!(self.script, ScriptStatus::Failed(_)) {
            return;
        }
        tracing::debug!(session = %self.session_id, "Widget script loaded");
        self.script = ScriptStatus::Loaded;
        self.initialize_widget().await;
    }

    /// The hosted script failed to load; no retry is attempted
    pub fn script_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!(session = %self.session_id, "Failed to load widget script: {}", reason);
        self.script = ScriptStatus::Failed(reason);
    }

    /// Switch payment method, rebuilding the widget for the new method
    pub async fn select_method(&mut self, method: PaymentMethod) {
        if method == self.method {
            return;
        }
        self.method = method;

        if self.development {
            tracing::debug!(
                session = %self.session_id,
                "Mock {} interface selected",
                method.display_name()
            );
            return;
        }

        self.initialize_widget().await;
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Submit the payment and return the resulting outcome
    pub async fn submit(&mut self) -> PaymentOutcome {
        if self.processing || self.outcome == PaymentOutcome::Success {
            tracing::debug!(session = %self.session_id, "Submission ignored while busy or complete");
            return self.outcome;
        }

        if self.instance.is_none() && !self.development {
            self.error_message = Some(NOT_INITIALIZED.into());
            return self.outcome;
        }

        self.processing = true;
        self.outcome = PaymentOutcome::Idle;
        self.error_message = None;

        match self.dispatch().await {
            Ok(()) => {
                tracing::info!(session = %self.session_id, amount = %self.amount, "Payment succeeded");
                self.outcome = PaymentOutcome::Success;
                self.schedule_redirect();
            }
            Err(e) => {
                tracing::error!(session = %self.session_id, "Payment error: {}", e);
                self.outcome = PaymentOutcome::Error;
                self.error_message = Some(format!("An unexpected error occurred: {e}"));
            }
        }

        if self.is_alive() {
            self.processing = false;
        }
        self.outcome
    }

    /// Tear down the active widget and stop applying late results
    pub async fn unmount(&mut self) {
        self.alive.mark_gone();

        if let Some(instance) = self.instance.take() {
            tracing::debug!(session = %self.session_id, "Cleaning up widget instance on unmount");
            if let Err(e) = instance.teardown().await {
                tracing::error!(session = %self.session_id, "Error tearing down widget instance: {}", e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn enter_development_mode(&mut self, cause: &CheckoutError) {
        tracing::debug!(session = %self.session_id, "Switching to development mode due to error");
        self.error_message = Some(format!("Failed to connect to payment service: {cause}"));
        self.development = true;
        self.development_notice = Some(DEVELOPMENT_NOTICE.into());
        self.client_token = Some(ClientToken::development());
        self.instance = Some(Box::new(MockWidget::new()));
    }

    fn ready_for_widget(&self) -> bool {
        self.mounted
            && self.is_alive()
            && !self.development
            && self.client_token.is_some()
            && self.script == ScriptStatus::Loaded
            && self.widget_error.is_none()
    }

    async fn initialize_widget(&mut self) {
        if !self.ready_for_widget() {
            return;
        }

        tokio::time::sleep(self.config.settle_delay).await;
        if !self.is_alive() {
            return;
        }

        let Some(token) = self.client_token.clone() else {
            return;
        };
        let container = self.config.container.clone();

        if self.factory.container_has_content(&container) {
            tracing::debug!(session = %self.session_id, "Container is not empty, clearing it");
            self.factory.clear_container(&container);
        }

        if let Some(previous) = self.instance.take() {
            tracing::debug!(session = %self.session_id, "Tearing down previous widget instance");
            if let Err(e) = previous.teardown().await {
                tracing::error!(session = %self.session_id, "Error tearing down widget instance: {}", e);
                self.instance = Some(previous);
                return;
            }
            if !self.is_alive() {
                return;
            }
        }

        let options = WidgetOptions::for_method(&token, &container, self.method);
        tracing::debug!(session = %self.session_id, method = %self.method, "Creating widget instance");

        match self.factory.create(options).await {
            Ok(instance) if self.is_alive() => {
                tracing::debug!(session = %self.session_id, "Widget instance created successfully");
                self.instance = Some(instance);
            }
            Ok(instance) => {
                if let Err(e) = instance.teardown().await {
                    tracing::warn!(session = %self.session_id, "Error tearing down late widget instance: {}", e);
                }
            }
            Err(e) => {
                tracing::error!(session = %self.session_id, "Error creating widget instance: {}", e);
                self.widget_error = Some(e.to_string());
            }
        }
    }

    async fn dispatch(&self) -> Result<()> {
        let nonce = self.request_nonce().await?;
        let request = PaymentRequest::new(nonce, &self.amount, &self.identity, self.method);

        if self.development {
            tracing::debug!(session = %self.session_id, ?request, "Development mode: simulating successful payment");
            tokio::time::sleep(self.config.simulated_processing).await;
            return Ok(());
        }

        let limit = self.config.payment_timeout;
        let receipt = tokio::time::timeout(limit, self.gateway.process_payment(&request))
            .await
            .map_err(|_| CheckoutError::timeout("payment request", limit.as_secs()))??;

        if receipt.is_successful() {
            Ok(())
        } else {
            Err(CheckoutError::Declined("Payment was not successful".into()))
        }
    }

    async fn request_nonce(&self) -> Result<String> {
        let nonce = match &self.instance {
            Some(instance) => instance.request_payment_method().await?,
            None => MOCK_NONCE.to_string(),
        };

        if nonce.is_empty() {
            return Err(CheckoutError::Widget("No payment method nonce received".into()));
        }
        Ok(nonce)
    }

    fn schedule_redirect(&mut self) {
        if self.redirect.is_some() {
            return;
        }

        let navigator = Arc::clone(&self.navigator);
        let alive = self.alive.clone();
        let delay = self.config.redirect_delay;
        let session_id = self.session_id;

        self.redirect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if alive.is_alive() {
                navigator.navigate(SUCCESS_PATH);
            } else {
                tracing::debug!(session = %session_id, "View gone, redirect dropped");
            }
        }));
    }

    fn is_alive(&self) -> bool {
        self.alive.is_alive()
    }

    /// Handle the hosting view uses to report it has gone away
    pub fn liveness(&self) -> Liveness {
        self.alive.clone()
    }

    // ------------------------------------------------------------------
    // View state
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        if self.outcome == PaymentOutcome::Success {
            Phase::Success
        } else if self.processing {
            Phase::SubmittingPayment
        } else if self.outcome == PaymentOutcome::Error {
            Phase::Error
        } else if !self.mounted {
            Phase::Uninitialized
        } else if self.loading {
            Phase::TokenPending
        } else if self.development {
            Phase::DevelopmentFallback
        } else if self.script_error().is_some() {
            Phase::ScriptError
        } else if self.instance.is_some() {
            Phase::WidgetReady
        } else {
            Phase::WidgetLoading
        }
    }

    /// Whether the pay button is enabled
    pub fn can_submit(&self) -> bool {
        !self.processing
            && self.outcome != PaymentOutcome::Success
            && (self.instance.is_some() || self.development)
    }

    pub fn submit_label(&self) -> String {
        if self.processing {
            "Processing...".into()
        } else {
            format!("Pay ${}", self.amount)
        }
    }

    /// Script or widget failure blocking the real widget
    pub fn script_error(&self) -> Option<&str> {
        match &self.script {
            ScriptStatus::Failed(reason) => Some(reason),
            _ => self.widget_error.as_deref(),
        }
    }

    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    pub const fn outcome(&self) -> PaymentOutcome {
        self.outcome
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn development_notice(&self) -> Option<&str> {
        self.development_notice.as_deref()
    }

    pub const fn is_development(&self) -> bool {
        self.development
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn is_processing(&self) -> bool {
        self.processing
    }

    pub const fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    pub const fn redirect_scheduled(&self) -> bool {
        self.redirect.is_some()
    }

    pub const fn client_token(&self) -> Option<&ClientToken> {
        self.client_token.as_ref()
    }

    pub const fn script_status(&self) -> &ScriptStatus {
        &self.script
    }
}
