//! Bitbucket Webhook Dispatcher Module
//!
//! Receives Bitbucket Cloud webhook deliveries, decodes the JSON body into the
//! payload type named by the `X-Event-Key` header and hands it to the handler
//! registered for that key.
//!
//! # Architecture
//!
//! ```text
//! Request -> Headers -> Webhook::dispatch -> catalog decode -> EventHandler
//!                               |                  |                |
//!                               v                  v                v
//!                     400 (no key/handler)   400 (bad body)   200 / 400
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bitbucket_webhooks::webhook::{webhook_router, Headers, Webhook};
//! use bitbucket_webhooks::events::PullRequestMergedEvent;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut webhook = Webhook::new();
//!     webhook.on(|_: &Headers, merged: PullRequestMergedEvent| {
//!         println!("merged #{}", merged.base.pull_request.id);
//!         Ok(())
//!     });
//!
//!     let app = webhook_router(Arc::new(webhook), "/webhooks");
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod dispatcher;
pub mod handlers;
pub mod headers;
pub mod http;

pub use dispatcher::{ErrorHook, Webhook};
pub use handlers::{EventHandler, FnHandler, LoggingHandler, TypedHandler};
pub use headers::{Headers, EVENT_KEY_HEADER, HEADERS_OF_INTEREST};
pub use http::{webhook_handler, webhook_router};
