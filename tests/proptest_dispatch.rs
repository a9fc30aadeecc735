//! Property-based testing for webhook dispatch.
//!
//! Uses proptest to generate arbitrary event keys and bodies and verify the
//! dispatcher's invariants: it never panics, failures always come with
//! exactly one hook call, and the handler only ever sees the payload type
//! the catalog assigns to its key.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use bitbucket_webhooks::events::catalog;
use bitbucket_webhooks::webhook::EVENT_KEY_HEADER;
use bitbucket_webhooks::{Headers, Webhook, WebhookError};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Strategy for catalog event keys
fn arb_catalog_key() -> impl Strategy<Value = &'static str> {
    let keys: Vec<&'static str> = catalog::event_keys().collect();
    prop::sample::select(keys)
}

/// Strategy for event keys, mostly well-formed, sometimes not in the catalog
fn arb_event_key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_catalog_key().prop_map(str::to_string),
        1 => "[a-z_]{1,12}:[a-z_]{1,20}",
        1 => ".{0,20}",
    ]
}

/// Strategy for small JSON values
fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,10}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for request bodies: JSON objects, arbitrary JSON, or raw bytes
fn arb_body() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::btree_map("[a-z_]{1,12}", arb_json_value(), 0..6).prop_map(|m| {
            let object: serde_json::Map<String, Value> = m.into_iter().collect();
            serde_json::to_vec(&Value::Object(object)).unwrap()
        }),
        arb_json_value().prop_map(|v| serde_json::to_vec(&v).unwrap()),
        prop::collection::vec(any::<u8>(), 0..64),
    ]
}

fn headers(event_key: &str) -> Headers {
    [(EVENT_KEY_HEADER, event_key)].into_iter().collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The hook runs exactly once per failure and never on success
    #[test]
    fn hook_runs_once_per_failure(
        registered in prop::collection::vec(arb_event_key(), 0..4),
        event_key in arb_event_key(),
        body in arb_body(),
    ) {
        let hook_calls = Arc::new(AtomicU32::new(0));
        let handler_calls = Arc::new(AtomicU32::new(0));

        let mut webhook = Webhook::new();
        for key in &registered {
            let calls = handler_calls.clone();
            webhook.handle(key.as_str(), move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        let counter = hook_calls.clone();
        webhook.set_log_on_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = runtime().block_on(webhook.dispatch(&headers(&event_key), &body));

        match result {
            Ok(()) => {
                prop_assert_eq!(hook_calls.load(Ordering::SeqCst), 0);
                prop_assert_eq!(handler_calls.load(Ordering::SeqCst), 1);
            }
            Err(_) => {
                prop_assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
                prop_assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
            }
        }
    }

    /// The failure kind is decided by the first failing step
    #[test]
    fn failure_follows_step_order(
        register in any::<bool>(),
        event_key in arb_event_key(),
        body in arb_body(),
    ) {
        let mut webhook = Webhook::new();
        if register {
            webhook.handle(event_key.as_str(), |_, _| Ok(()));
        }

        let result = runtime().block_on(webhook.dispatch(&headers(&event_key), &body));

        if event_key.is_empty() {
            prop_assert_eq!(result, Err(WebhookError::MissingEventKey));
        } else if !register {
            prop_assert_eq!(result, Err(WebhookError::UnknownHandler(event_key.clone())));
        } else if !catalog::is_supported(&event_key) {
            prop_assert_eq!(result, Err(WebhookError::UnsupportedEventKey(event_key.clone())));
        } else {
            let parsed = catalog::lookup(&event_key).unwrap().decode(&body);
            match (parsed, result) {
                (Ok(_), Ok(())) => {}
                (Err(e), Err(WebhookError::BodyParse(msg))) => {
                    prop_assert_eq!(msg, e.to_string());
                }
                (parsed, result) => {
                    prop_assert!(
                        false,
                        "decode {:?} disagrees with dispatch {:?}",
                        parsed.map(|ev| ev.type_name()),
                        result
                    );
                }
            }
        }
    }

    /// The handler for key K only ever sees the catalog variant for K
    #[test]
    fn handler_sees_catalog_variant(event_key in arb_catalog_key(), body in arb_body()) {
        let mut webhook = Webhook::new();
        let expected = event_key;
        webhook.handle(event_key, move |_, event| {
            anyhow::ensure!(event.event_key() == expected, "got {}", event.event_key());
            Ok(())
        });

        let result = runtime().block_on(webhook.dispatch(&headers(event_key), &body));
        if let Err(err) = result {
            prop_assert_eq!(err.kind(), "body_parse");
        }
    }

    /// An empty JSON object decodes for every catalog key
    #[test]
    fn empty_object_always_handled(event_key in arb_catalog_key()) {
        let mut webhook = Webhook::new();
        webhook.handle(event_key, |_, _| Ok(()));
        let result = runtime().block_on(webhook.dispatch(&headers(event_key), b"{}"));
        prop_assert!(result.is_ok());
    }
}
