//! Handler trait and the built-in handler adapters.

use std::fmt;
use std::marker::PhantomData;

use anyhow::anyhow;
use tracing::info;

use crate::events::{Event, WebhookEvent};
use crate::webhook::headers::Headers;

/// Callback invoked with a decoded delivery.
///
/// Implement this directly for handlers that need to await; plain closures go
/// through [`crate::Webhook::handle`] or [`crate::Webhook::on`] instead.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Handle one delivery. An error is reported back to Bitbucket as `400`.
    async fn handle(&self, headers: &Headers, event: Event) -> anyhow::Result<()>;
}

/// Adapts a synchronous closure over [`Event`].
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&Headers, Event) -> anyhow::Result<()> + Send + Sync + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait::async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&Headers, Event) -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn handle(&self, headers: &Headers, event: Event) -> anyhow::Result<()> {
        (self.0)(headers, event)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHandler")
    }
}

/// Adapts a closure over one concrete payload type.
pub struct TypedHandler<E, F> {
    f: F,
    _event: PhantomData<fn() -> E>,
}

impl<E, F> TypedHandler<E, F>
where
    E: WebhookEvent,
    F: Fn(&Headers, E) -> anyhow::Result<()> + Send + Sync + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _event: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<E, F> EventHandler for TypedHandler<E, F>
where
    E: WebhookEvent,
    F: Fn(&Headers, E) -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn handle(&self, headers: &Headers, event: Event) -> anyhow::Result<()> {
        match E::from_event(event) {
            Ok(payload) => (self.f)(headers, payload),
            // Only reachable if the handler was registered under a foreign key.
            Err(other) => Err(anyhow!(
                "expected {} payload, got {}",
                E::EVENT_KEY,
                other.type_name()
            )),
        }
    }
}

impl<E, F> fmt::Debug for TypedHandler<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedHandler")
            .field("event", &std::any::type_name::<E>())
            .finish()
    }
}

/// Logs a one-line summary of every delivery and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

#[async_trait::async_trait]
impl EventHandler for LoggingHandler {
    async fn handle(&self, headers: &Headers, event: Event) -> anyhow::Result<()> {
        info!(
            event_key = event.event_key(),
            repository = %event.repository().full_name,
            actor = %event.actor().username,
            request_uuid = %headers.request_uuid().map(|u| u.to_string()).unwrap_or_default(),
            attempt = headers.attempt_number().unwrap_or(1),
            "{}",
            event.summary()
        );
        Ok(())
    }
}
