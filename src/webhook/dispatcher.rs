//! The event-key dispatcher.
//!
//! ```text
//! X-Event-Key ──> handler registry ──> payload catalog ──> decode body ──> handler
//!      │                 │                    │                 │             │
//!      ▼                 ▼                    ▼                 ▼             ▼
//!  MissingEventKey  UnknownHandler  UnsupportedEventKey    BodyParse       Handler
//! ```
//!
//! Every arrow that fails ends the delivery with `400` and one call of the
//! diagnostic hook.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::error::WebhookError;
use crate::events::{catalog, Event, WebhookEvent};
use crate::metrics::DispatchMetrics;
use crate::webhook::handlers::{EventHandler, FnHandler, TypedHandler};
use crate::webhook::headers::Headers;

/// Callback receiving the formatted message of every failed dispatch.
pub type ErrorHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Routes deliveries to handlers by event key.
///
/// Handlers are registered through `&mut self`, so all registration happens
/// before the dispatcher is wrapped in an `Arc` and handed to the server.
///
/// ```rust
/// use bitbucket_webhooks::{Headers, Webhook};
/// use bitbucket_webhooks::events::RepoPushEvent;
///
/// let mut webhook = Webhook::new();
/// webhook.on(|_: &Headers, push: RepoPushEvent| {
///     println!("push to {}", push.repository.full_name);
///     Ok(())
/// });
/// assert!(webhook.has_handler("repo:push"));
/// ```
#[derive(Default)]
pub struct Webhook {
    handlers: HashMap<String, Arc<dyn EventHandler>>,
    log_on_error: Option<ErrorHook>,
    metrics: Option<Arc<DispatchMetrics>>,
}

impl Webhook {
    /// An empty dispatcher. It rejects every delivery until handlers are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure for an event key, replacing any previous handler.
    ///
    /// The key is not checked against the catalog; a key Bitbucket does not
    /// define is rejected at dispatch time with
    /// [`WebhookError::UnsupportedEventKey`].
    pub fn handle<F>(&mut self, event_key: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Headers, Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(event_key, FnHandler::new(handler))
    }

    /// Register a closure for the event key of payload type `E`.
    pub fn on<E, F>(&mut self, handler: F) -> &mut Self
    where
        E: WebhookEvent,
        F: Fn(&Headers, E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(E::EVENT_KEY, TypedHandler::<E, F>::new(handler))
    }

    /// Register any [`EventHandler`] for an event key, replacing any previous
    /// handler.
    pub fn register<H: EventHandler>(
        &mut self,
        event_key: impl Into<String>,
        handler: H,
    ) -> &mut Self {
        self.register_shared(event_key, Arc::new(handler))
    }

    /// Register a handler that is shared between several keys.
    pub fn register_shared(
        &mut self,
        event_key: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) -> &mut Self {
        let event_key = event_key.into();
        if self.handlers.insert(event_key.clone(), handler).is_some() {
            debug!(event_key = %event_key, "Replaced webhook handler");
        }
        self
    }

    /// Install the diagnostic hook called once per failed dispatch.
    pub fn set_log_on_error<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.log_on_error = Some(Arc::new(hook));
        self
    }

    /// Record every dispatch into `metrics`.
    pub fn set_metrics(&mut self, metrics: Arc<DispatchMetrics>) -> &mut Self {
        self.metrics = Some(metrics);
        self
    }

    /// The metrics collector, if one was attached.
    pub fn metrics(&self) -> Option<&Arc<DispatchMetrics>> {
        self.metrics.as_ref()
    }

    /// Whether a handler is registered for `event_key`.
    pub fn has_handler(&self, event_key: &str) -> bool {
        self.handlers.contains_key(event_key)
    }

    /// Registered event keys, sorted.
    pub fn event_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Dispatch one delivery.
    ///
    /// On failure the diagnostic hook has already run when this returns.
    #[instrument(skip_all, fields(event_key = headers.event_key().unwrap_or_default()))]
    pub async fn dispatch(&self, headers: &Headers, body: &[u8]) -> Result<(), WebhookError> {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.record_delivery(headers.event_key().unwrap_or_default());
        }
        debug!(body_bytes = body.len(), "Webhook delivery received");

        match self.route(headers, body).await {
            Ok(()) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_handled(started.elapsed());
                }
                Ok(())
            }
            Err(err) => {
                debug!(kind = err.kind(), error = %err, "Webhook dispatch failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_failure(err.kind(), started.elapsed());
                }
                if let Some(hook) = &self.log_on_error {
                    hook(&err.to_string());
                }
                Err(err)
            }
        }
    }

    async fn route(&self, headers: &Headers, body: &[u8]) -> Result<(), WebhookError> {
        let event_key = headers.event_key().ok_or(WebhookError::MissingEventKey)?;

        let handler = self
            .handlers
            .get(event_key)
            .ok_or_else(|| WebhookError::UnknownHandler(event_key.to_string()))?;

        let shape = catalog::lookup(event_key)
            .ok_or_else(|| WebhookError::UnsupportedEventKey(event_key.to_string()))?;

        let event = shape
            .decode(body)
            .map_err(|e| WebhookError::BodyParse(e.to_string()))?;

        handler
            .handle(headers, event)
            .await
            .map_err(|e| WebhookError::Handler(format!("{:#}", e)))?;

        info!(payload = shape.type_name, "Webhook event handled");
        Ok(())
    }
}

impl fmt::Debug for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webhook")
            .field("handlers", &self.event_keys())
            .field("log_on_error", &self.log_on_error.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
