//! Bitbucket Webhooks - Typed Bitbucket Cloud Webhook Receiver
//!
//! This crate receives Bitbucket Cloud webhook deliveries over HTTP, decodes
//! each JSON body into the payload type named by its `X-Event-Key` header and
//! dispatches it to the handler registered for that key.
//!
//! # Features
//!
//! - **Typed Payloads**: one Rust type per Bitbucket event, 17 in all
//! - **Event-Key Dispatch**: a registry of handlers keyed by event key
//! - **axum Integration**: a ready-made handler and router
//! - **Observability**: structured `tracing` logs and Prometheus metrics
//!
//! # Architecture
//!
//! ```text
//! Bitbucket ──▶ axum Router ──▶ Webhook::dispatch
//!                                    │
//!                    ┌───────────────┼────────────────┐
//!                    ▼               ▼                ▼
//!              handler registry   catalog        EventHandler
//!              (event key)       (payload)      (your code)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bitbucket_webhooks::{webhook_router, Event, Headers, Webhook};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut webhook = Webhook::new();
//!     webhook.handle("repo:push", |_headers: &Headers, event: Event| {
//!         println!("{}: {}", event.repository().full_name, event.summary());
//!         Ok(())
//!     });
//!
//!     let app = webhook_router(Arc::new(webhook), "/webhooks");
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod webhook;

// Re-exports for convenience
pub use config::ServerConfig;
pub use error::{Error, Result, WebhookError};
pub use events::{Event, WebhookEvent};
pub use metrics::DispatchMetrics;
pub use webhook::{webhook_handler, webhook_router, EventHandler, Headers, Webhook};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
