//! Bitbucket webhook receiver
//!
//! Logs every Bitbucket Cloud delivery it receives.

use std::sync::Arc;

use anyhow::Context;
use bitbucket_webhooks::config::{LogFormat, ServerConfig};
use bitbucket_webhooks::events::catalog;
use bitbucket_webhooks::metrics::DispatchMetrics;
use bitbucket_webhooks::server;
use bitbucket_webhooks::webhook::{EventHandler, LoggingHandler, Webhook};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing(&config);
    config.validate().context("invalid configuration")?;

    let metrics = Arc::new(DispatchMetrics::new());
    let mut webhook = Webhook::new();
    webhook.set_metrics(metrics.clone());
    webhook.set_log_on_error(|message| {
        tracing::warn!(error = %message, "Rejected webhook delivery");
    });

    let handler: Arc<dyn EventHandler> = Arc::new(LoggingHandler);
    for event_key in catalog::event_keys() {
        webhook.register_shared(event_key, handler.clone());
    }

    tracing::info!(
        version = bitbucket_webhooks::VERSION,
        event_keys = webhook.event_keys().len(),
        "Bitbucket webhook receiver starting"
    );

    server::run(&config, Arc::new(webhook), metrics).await?;
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}
