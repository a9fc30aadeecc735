//! Error types for the Bitbucket webhook receiver
//!
//! [`WebhookError`] is the dispatch taxonomy: every variant describes a
//! problem with one inbound delivery and is answered with `400 Bad Request`.
//! [`Error`] covers everything around the dispatcher (configuration,
//! binding the listener, serving).

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure to dispatch a single webhook delivery.
///
/// The display strings are the exact response bodies sent to Bitbucket.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The `X-Event-Key` header is absent or empty
    #[error("Missing X-Event-Key")]
    MissingEventKey,

    /// No handler is registered for the event key
    #[error("No handler for the event key: {0}")]
    UnknownHandler(String),

    /// A handler is registered but the catalog has no payload for the key
    #[error("Unsupported event key type: {0}")]
    UnsupportedEventKey(String),

    /// The body is not JSON or does not fit the payload shape
    #[error("Read error: {0}")]
    BodyParse(String),

    /// The registered handler returned an error
    #[error("Error handling the event: {0}")]
    Handler(String),
}

impl WebhookError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingEventKey => "missing_event_key",
            Self::UnknownHandler(_) => "unknown_handler",
            Self::UnsupportedEventKey(_) => "unsupported_event_key",
            Self::BodyParse(_) => "body_parse",
            Self::Handler(_) => "handler",
        }
    }

    /// HTTP status for this failure. Always `400`: every dispatch failure is
    /// reported as a problem with the delivery.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), format!("{}\n", self)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        response
    }
}

/// The main error type for the receiver outside of dispatch
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid server configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (binding, serving)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for receiver operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error from a string
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}
