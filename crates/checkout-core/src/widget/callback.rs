//! Callback-style widget construction
//!
//! The hosted script reports creation through an error-first callback.
//! [`Promisified`] turns that contract into an awaitable [`WidgetFactory`].

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{WidgetFactory, WidgetInstance, WidgetOptions};
use crate::error::{CheckoutError, Result};

/// Completion callback handed to the hosted script
pub type CreateCallback = Box<dyn FnOnce(Result<Box<dyn WidgetInstance>>) + Send>;

/// Raw `create(options, callback)` entry point exposed by the hosted script
pub trait CallbackWidgetFactory: Send + Sync {
    /// Start creating a widget; `callback` fires once with the outcome
    fn create(&self, options: WidgetOptions, callback: CreateCallback);

    fn container_has_content(&self, _container: &str) -> bool {
        false
    }

    fn clear_container(&self, _container: &str) {}
}

/// Awaitable adapter over a [`CallbackWidgetFactory`]
pub struct Promisified<F> {
    inner: F,
}

impl<F: CallbackWidgetFactory> Promisified<F> {
    pub const fn new(inner: F) -> Self {
        Self { inner }
    }

    pub const fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: CallbackWidgetFactory> WidgetFactory for Promisified<F> {
    async fn create(&self, options: WidgetOptions) -> Result<Box<dyn WidgetInstance>> {
        let (tx, rx) = oneshot::channel();
        self.inner.create(
            options,
            Box::new(move |result| {
                // Receiver is gone only if the awaiting side was dropped
                let _ = tx.send(result);
            }),
        );

        rx.await.map_err(|_| {
            CheckoutError::Widget("widget factory dropped the creation callback".into())
        })?
    }

    fn container_has_content(&self, container: &str) -> bool {
        self.inner.container_has_content(container)
    }

    fn clear_container(&self, container: &str) {
        self.inner.clear_container(container);
    }
}
