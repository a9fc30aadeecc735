//! Delivery headers captured for handlers.

use std::collections::HashMap;

use axum::http::HeaderMap;
use uuid::Uuid;

/// Header naming the event type of a delivery.
pub const EVENT_KEY_HEADER: &str = "X-Event-Key";

/// Unique id of the webhook configuration that fired.
pub const HOOK_UUID_HEADER: &str = "X-Hook-UUID";

/// Unique id of this delivery; stays the same across retries.
pub const REQUEST_UUID_HEADER: &str = "X-Request-UUID";

/// Delivery attempt, starting at 1.
pub const ATTEMPT_NUMBER_HEADER: &str = "X-Attempt-Number";

/// Every header copied into [`Headers`].
pub const HEADERS_OF_INTEREST: [&str; 4] = [
    EVENT_KEY_HEADER,
    HOOK_UUID_HEADER,
    REQUEST_UUID_HEADER,
    ATTEMPT_NUMBER_HEADER,
];

/// The headers of interest for one delivery.
///
/// Every name in [`HEADERS_OF_INTEREST`] is present; a header the request did
/// not carry (or carried as non-UTF-8) is stored as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    /// Capture the headers of interest from a request.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        HEADERS_OF_INTEREST
            .iter()
            .map(|&name| {
                let value = map
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                (name.to_string(), value.to_string())
            })
            .collect()
    }

    /// Raw value of a captured header, by its canonical name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The event key, or `None` when absent or empty.
    pub fn event_key(&self) -> Option<&str> {
        self.get(EVENT_KEY_HEADER).filter(|key| !key.is_empty())
    }

    /// Webhook configuration id.
    pub fn hook_uuid(&self) -> Option<Uuid> {
        self.parse_uuid(HOOK_UUID_HEADER)
    }

    /// Delivery id.
    pub fn request_uuid(&self) -> Option<Uuid> {
        self.parse_uuid(REQUEST_UUID_HEADER)
    }

    /// Delivery attempt number.
    pub fn attempt_number(&self) -> Option<u32> {
        self.get(ATTEMPT_NUMBER_HEADER)?.trim().parse().ok()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn parse_uuid(&self, name: &str) -> Option<Uuid> {
        // Bitbucket wraps these in braces: {7d5f...}
        let raw = self.get(name)?.trim_start_matches('{').trim_end_matches('}');
        Uuid::parse_str(raw).ok()
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        Self::from_header_map(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
