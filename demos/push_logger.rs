//! Print every push and merged pull request delivered to `/webhooks`.
//!
//! ```bash
//! cargo run --example push-logger
//! curl -X POST localhost:3001/webhooks \
//!     -H 'X-Event-Key: repo:push' \
//!     -d @tests/fixtures/push.json
//! ```

use std::sync::Arc;

use bitbucket_webhooks::events::{PullRequestMergedEvent, RepoPushEvent};
use bitbucket_webhooks::{webhook_router, Headers, Webhook};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut webhook = Webhook::new();
    webhook
        .on(|headers: &Headers, push: RepoPushEvent| {
            for change in &push.push.changes {
                for commit in &change.commits {
                    info!(
                        repository = %push.repository.full_name,
                        branch = change.ref_name(),
                        attempt = headers.attempt_number().unwrap_or(1),
                        "{} {}",
                        commit.hash.get(..7).unwrap_or(&commit.hash),
                        commit.message.lines().next().unwrap_or_default()
                    );
                }
            }
            Ok(())
        })
        .on(|_: &Headers, merged: PullRequestMergedEvent| {
            let pr = &merged.base.pull_request;
            info!(
                repository = %merged.base.repository.full_name,
                "merged #{} {} into {}",
                pr.id,
                pr.title,
                pr.destination.branch.name
            );
            Ok(())
        })
        .set_log_on_error(|message| tracing::warn!(error = %message, "Rejected delivery"));

    let app = webhook_router(Arc::new(webhook), "/webhooks");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
