//! HTTP server wiring for the receiver binary.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::handlers::status_router;
use crate::metrics::DispatchMetrics;
use crate::webhook::{webhook_router, Webhook};

/// The full application: the webhook endpoint on `config.path` plus the
/// status endpoints, with request tracing and the body limit applied.
pub fn build_router(
    config: &ServerConfig,
    webhook: Arc<Webhook>,
    metrics: Arc<DispatchMetrics>,
) -> Router {
    webhook_router(webhook, &config.path)
        .merge(status_router(metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        )
}

/// Bind and serve until Ctrl-C.
pub async fn run(
    config: &ServerConfig,
    webhook: Arc<Webhook>,
    metrics: Arc<DispatchMetrics>,
) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = build_router(config, webhook, metrics);

    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        path = %config.path,
        "Bitbucket webhook receiver listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Bitbucket webhook receiver stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
