//! axum integration for the dispatcher.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use crate::webhook::dispatcher::Webhook;
use crate::webhook::headers::Headers;

/// Webhook endpoint handler.
///
/// # Response
/// - `200 OK` with an empty body when the handler succeeded
/// - `400 Bad Request` with a plain-text message otherwise
pub async fn webhook_handler(
    State(webhook): State<Arc<Webhook>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let headers = Headers::from_header_map(&headers);
    match webhook.dispatch(&headers, &body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}

/// A router serving `webhook` on `path` for every HTTP method.
///
/// ```rust
/// use std::sync::Arc;
/// use bitbucket_webhooks::{webhook_router, Webhook};
///
/// let app: axum::Router = webhook_router(Arc::new(Webhook::new()), "/webhooks");
/// ```
pub fn webhook_router(webhook: Arc<Webhook>, path: &str) -> Router {
    Router::new()
        .route(path, any(webhook_handler))
        .with_state(webhook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_success_is_empty_200() {
        let mut webhook = Webhook::new();
        webhook.handle("repo:fork", |_, _| Ok(()));
        let app = webhook_router(Arc::new(webhook), "/hook");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hook")
                    .header("x-event-key", "repo:fork")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_plain_400() {
        let app = webhook_router(Arc::new(Webhook::new()), "/hook");

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/hook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Missing X-Event-Key\n");
    }

    #[tokio::test]
    async fn test_other_paths_not_routed() {
        let app = webhook_router(Arc::new(Webhook::new()), "/hook");
        let response = app
            .oneshot(Request::builder().uri("/elsewhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
