//! Status and health check handlers for the webhook receiver.
//!
//! This module provides HTTP endpoints for monitoring the receiver:
//! - `/health` - Simple health check for systemd/load balancers
//! - `/status` - Delivery counters and dispatch latency
//! - `/metrics` - Prometheus text exposition
//!
//! # Example Response
//!
//! ```json
//! {
//!   "name": "bitbucket-webhooks",
//!   "version": "0.1.0",
//!   "status": "running",
//!   "uptime_seconds": 3600,
//!   "deliveries": { "received": 120, "handled": 117, "failed": 3 },
//!   "latency": { "p50_ms": 0.4, "p95_ms": 1.9, "p99_ms": 4.2, "samples": 120 },
//!   "timestamp": "2026-01-01T12:00:00+00:00"
//! }
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::metrics::{DispatchMetrics, LatencySummary};

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name from Cargo.toml
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Health check response for simple liveness probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (always "healthy" if responding)
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Delivery counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCounts {
    /// Deliveries received
    pub received: u64,
    /// Deliveries whose handler succeeded
    pub handled: u64,
    /// Deliveries answered with 400
    pub failed: u64,
}

/// Detailed receiver status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server name
    pub name: String,

    /// Server version (from Cargo.toml)
    pub version: String,

    /// Server status (always "running" if responding)
    pub status: String,

    /// Server uptime in seconds
    pub uptime_seconds: u64,

    /// Delivery counters
    pub deliveries: DeliveryCounts,

    /// Dispatch latency percentiles
    pub latency: LatencySummary,

    /// RFC 3339 timestamp of when status was generated
    pub timestamp: String,
}

impl StatusResponse {
    /// Snapshot the given metrics.
    pub fn from_metrics(metrics: &DispatchMetrics) -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            status: "running".to_string(),
            uptime_seconds: metrics.uptime_seconds(),
            deliveries: DeliveryCounts {
                received: metrics.deliveries(),
                handled: metrics.handled(),
                failed: metrics.failed(),
            },
            latency: metrics.latency(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Health check endpoint handler.
///
/// # Route
/// `GET /health`
#[instrument(skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    debug!("Health check requested");
    (StatusCode::OK, Json(HealthResponse::default()))
}

/// Detailed status endpoint handler.
///
/// # Route
/// `GET /status`
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/status
/// ```
#[instrument(skip_all)]
pub async fn status_handler(State(metrics): State<Arc<DispatchMetrics>>) -> impl IntoResponse {
    debug!("Status check requested");
    (StatusCode::OK, Json(StatusResponse::from_metrics(&metrics)))
}

/// Prometheus endpoint handler.
///
/// # Route
/// `GET /metrics`
#[instrument(skip_all)]
pub async fn metrics_handler(State(metrics): State<Arc<DispatchMetrics>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.to_prometheus_format(),
    )
}

/// Create the status router with the health, status and metrics endpoints.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use bitbucket_webhooks::handlers::status_router;
/// use bitbucket_webhooks::metrics::DispatchMetrics;
///
/// let app: axum::Router = status_router(Arc::new(DispatchMetrics::new()));
/// ```
pub fn status_router(metrics: Arc<DispatchMetrics>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    #[test]
    fn test_health_response_default() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_status_from_metrics() {
        let metrics = DispatchMetrics::new();
        metrics.record_delivery("repo:push");
        metrics.record_handled(Duration::from_millis(1));
        metrics.record_delivery("repo:push");
        metrics.record_failure("body_parse", Duration::from_millis(1));

        let status = StatusResponse::from_metrics(&metrics);
        assert_eq!(status.name, SERVER_NAME);
        assert_eq!(
            status.deliveries,
            DeliveryCounts {
                received: 2,
                handled: 1,
                failed: 1
            }
        );
        assert_eq!(status.latency.samples, 2);
    }

    #[test]
    fn test_status_response_serialization() {
        let status = StatusResponse::from_metrics(&DispatchMetrics::new());
        let json = serde_json::to_string(&status).expect("Failed to serialize");
        assert!(json.contains("\"status\":\"running\""));
        assert!(json.contains("\"deliveries\":{\"received\":0,\"handled\":0,\"failed\":0}"));
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = status_router(Arc::new(DispatchMetrics::new()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"healthy"}"#);
    }

    #[tokio::test]
    async fn test_metrics_route() {
        let metrics = Arc::new(DispatchMetrics::new());
        metrics.record_delivery("repo:fork");
        let app = status_router(metrics);

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("bb_webhooks_deliveries_total 1"));
    }
}
