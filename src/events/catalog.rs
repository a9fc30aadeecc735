//! Static event-key → payload-shape catalog.
//!
//! The table is generated at compile time from the same list that defines
//! [`Event`], so every key maps to exactly one variant and there is no way to
//! add or change an entry at runtime.

use super::{Event, WebhookEvent, SHAPES};

/// Builds a fresh payload from a JSON body.
pub type PayloadDecoder = fn(&[u8]) -> serde_json::Result<Event>;

/// One catalog entry: an event key and the payload it carries.
#[derive(Clone, Copy)]
pub struct PayloadShape {
    /// The `X-Event-Key` value
    pub event_key: &'static str,
    /// Name of the payload type
    pub type_name: &'static str,
    pub(crate) decode: PayloadDecoder,
}

impl PayloadShape {
    /// Decode a JSON body into a new payload of this shape.
    ///
    /// Missing or `null` fields take their zero value and unknown fields are
    /// ignored. The body must hold exactly one JSON object; a bare `null` or
    /// trailing bytes are an error.
    pub fn decode(&self, body: &[u8]) -> serde_json::Result<Event> {
        (self.decode)(body)
    }
}

impl std::fmt::Debug for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadShape")
            .field("event_key", &self.event_key)
            .field("type_name", &self.type_name)
            .finish()
    }
}

pub(crate) fn decode<E: WebhookEvent>(body: &[u8]) -> serde_json::Result<Event> {
    serde_json::from_slice::<E>(body).map(Into::into)
}

/// Look up the payload shape for an event key.
pub fn lookup(event_key: &str) -> Option<&'static PayloadShape> {
    SHAPES.iter().find(|shape| shape.event_key == event_key)
}

/// Whether Bitbucket defines a payload for this event key.
pub fn is_supported(event_key: &str) -> bool {
    lookup(event_key).is_some()
}

/// All supported event keys, in catalog order.
pub fn event_keys() -> impl Iterator<Item = &'static str> {
    SHAPES.iter().map(|shape| shape.event_key)
}

/// All catalog entries.
pub fn shapes() -> &'static [PayloadShape] {
    SHAPES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const WIRE_KEYS: [&str; 17] = [
        "repo:push",
        "repo:fork",
        "repo:commit_comment_created",
        "repo:commit_status_created",
        "repo:commit_status_updated",
        "issue:created",
        "issue:updated",
        "issue:comment_created",
        "pullrequest:created",
        "pullrequest:updated",
        "pullrequest:approved",
        "pullrequest:unapproved",
        "pullrequest:fulfilled",
        "pullrequest:rejected",
        "pullrequest:comment_created",
        "pullrequest:comment_updated",
        "pull_request:comment_deleted",
    ];

    #[test]
    fn test_catalog_matches_wire_keys() {
        let keys: Vec<&str> = event_keys().collect();
        assert_eq!(keys, WIRE_KEYS);
    }

    #[test]
    fn test_keys_unique() {
        let unique: HashSet<&str> = event_keys().collect();
        assert_eq!(unique.len(), shapes().len());
    }

    #[test]
    fn test_comment_deleted_keeps_odd_separator() {
        assert!(is_supported("pull_request:comment_deleted"));
        assert!(!is_supported("pullrequest:comment_deleted"));
    }

    #[test]
    fn test_empty_object_decodes_for_every_key() {
        for shape in shapes() {
            let event = shape.decode(b"{}").unwrap();
            assert_eq!(event.event_key(), shape.event_key);
            assert_eq!(event.type_name(), shape.type_name);
        }
    }

    #[test]
    fn test_decode_fills_fields() {
        let shape = lookup("repo:fork").unwrap();
        let event = shape
            .decode(br#"{"fork": {"name": "test-repo-forked"}}"#)
            .unwrap();
        match event {
            Event::RepoFork(fork) => assert_eq!(fork.fork.name, "test-repo-forked"),
            other => panic!("unexpected variant {}", other.type_name()),
        }
    }

    #[test]
    fn test_decode_type_mismatch() {
        let shape = lookup("repo:push").unwrap();
        let err = shape.decode(br#"{"repository": {"name": 5}}"#).unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn test_null_fields_decode_as_zero_values() {
        let cases: [(&str, &[u8]); 8] = [
            ("repo:push", br#"{"repository": {"name": null, "links": null}}"#),
            ("repo:push", br#"{"push": {"changes": [{"commits": null, "forced": null}]}}"#),
            ("issue:created", br#"{"issue": {"content": null, "id": null}}"#),
            ("issue:updated", br#"{"comment": null, "changes": {"status": null}}"#),
            ("pullrequest:created", br#"{"pullrequest": {"id": null, "participants": null}}"#),
            ("pullrequest:approved", br#"{"approval": {"user": null}, "actor": null}"#),
            ("repo:commit_status_created", br#"{"commit_status": {"state": null}}"#),
            ("pull_request:comment_deleted", br#"{"comment": {"content": null, "id": null}}"#),
        ];
        for (event_key, body) in cases {
            let event = lookup(event_key).unwrap().decode(body).unwrap();
            assert_eq!(event.event_key(), event_key);
        }
    }

    #[test]
    fn test_null_and_trailing_bodies_rejected() {
        let shape = lookup("repo:push").unwrap();
        assert!(shape.decode(b"null").is_err());
        let err = shape.decode(b"{} trailing").unwrap_err();
        assert!(err.to_string().contains("trailing characters"));
    }

    #[test]
    fn test_unknown_key() {
        assert!(lookup("repo:deleted").is_none());
        assert!(lookup("").is_none());
    }
}
