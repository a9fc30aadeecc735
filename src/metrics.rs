//! Dispatch metrics for the webhook receiver
//!
//! This module provides lock-light metrics collection with:
//! - Atomic counters for deliveries received, handled and failed
//! - Failures broken down by error kind, deliveries by event key
//! - A ring buffer of dispatch durations for percentile calculation
//! - Prometheus-compatible text format export
//!
//! # Example
//!
//! ```rust
//! use bitbucket_webhooks::metrics::DispatchMetrics;
//! use std::time::Duration;
//!
//! let metrics = DispatchMetrics::new();
//! metrics.record_delivery("repo:push");
//! metrics.record_handled(Duration::from_millis(3));
//!
//! let output = metrics.to_prometheus_format();
//! assert!(output.contains("bb_webhooks_deliveries_total 1"));
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::events::catalog;

/// Maximum number of duration samples to keep
const MAX_DURATION_SAMPLES: usize = 1000;

/// Label used for event keys outside the catalog, so arbitrary header values
/// cannot grow the label set.
const OTHER_EVENT_KEY: &str = "other";

/// Counters and timings for webhook dispatch.
///
/// Share one instance between the dispatcher and the `/metrics` endpoint
/// through an `Arc`.
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Total number of deliveries received
    pub deliveries_total: AtomicU64,
    /// Deliveries whose handler returned `Ok`
    pub handled_total: AtomicU64,
    /// Deliveries answered with an error
    pub failed_total: AtomicU64,

    durations: RwLock<RingBuffer<Duration>>,
    deliveries_by_event_key: RwLock<BTreeMap<String, u64>>,
    failures_by_kind: RwLock<BTreeMap<&'static str, u64>>,
    start_time: Instant,
}

/// Memory-efficient ring buffer for duration samples
#[derive(Debug)]
struct RingBuffer<T> {
    data: Vec<T>,
    capacity: usize,
    /// Position of next write (wraps around)
    write_pos: usize,
}

impl<T: Clone + Ord> RingBuffer<T> {
    fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            write_pos: 0,
        }
    }

    fn push(&mut self, value: T) {
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.write_pos] = value;
        }
        self.write_pos = (self.write_pos + 1) % self.capacity;
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    /// Calculate percentile (0.0 to 1.0)
    fn percentile(&self, p: f64) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let mut sorted = self.data.clone();
        sorted.sort();
        let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
        sorted.get(idx).cloned()
    }
}

/// Dispatch duration percentiles in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Median
    pub p50_ms: f64,
    /// 95th percentile
    pub p95_ms: f64,
    /// 99th percentile
    pub p99_ms: f64,
    /// Number of samples the percentiles were computed from
    pub samples: usize,
}

impl DispatchMetrics {
    /// Create an empty collector. Uptime is measured from this call.
    pub fn new() -> Self {
        Self {
            deliveries_total: AtomicU64::new(0),
            handled_total: AtomicU64::new(0),
            failed_total: AtomicU64::new(0),
            durations: RwLock::new(RingBuffer::new(MAX_DURATION_SAMPLES)),
            deliveries_by_event_key: RwLock::new(BTreeMap::new()),
            failures_by_kind: RwLock::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record an inbound delivery. An empty key means the header was missing.
    pub fn record_delivery(&self, event_key: &str) {
        self.deliveries_total.fetch_add(1, Ordering::Relaxed);

        if event_key.is_empty() {
            return;
        }
        let label = if catalog::is_supported(event_key) {
            event_key
        } else {
            OTHER_EVENT_KEY
        };
        *self
            .deliveries_by_event_key
            .write()
            .entry(label.to_string())
            .or_insert(0) += 1;
    }

    /// Record a delivery whose handler succeeded.
    pub fn record_handled(&self, duration: Duration) {
        self.handled_total.fetch_add(1, Ordering::Relaxed);
        self.durations.write().push(duration);
    }

    /// Record a failed delivery under its error kind.
    pub fn record_failure(&self, kind: &'static str, duration: Duration) {
        self.failed_total.fetch_add(1, Ordering::Relaxed);
        *self.failures_by_kind.write().entry(kind).or_insert(0) += 1;
        self.durations.write().push(duration);
    }

    /// Deliveries received so far.
    #[inline]
    pub fn deliveries(&self) -> u64 {
        self.deliveries_total.load(Ordering::Relaxed)
    }

    /// Deliveries handled successfully so far.
    #[inline]
    pub fn handled(&self) -> u64 {
        self.handled_total.load(Ordering::Relaxed)
    }

    /// Deliveries that failed so far.
    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed_total.load(Ordering::Relaxed)
    }

    /// Failure count for one error kind.
    pub fn failures_of_kind(&self, kind: &str) -> u64 {
        self.failures_by_kind.read().get(kind).copied().unwrap_or(0)
    }

    /// Delivery count for one event key label.
    pub fn deliveries_of_event_key(&self, event_key: &str) -> u64 {
        self.deliveries_by_event_key
            .read()
            .get(event_key)
            .copied()
            .unwrap_or(0)
    }

    /// Seconds since the collector was created.
    #[inline]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Dispatch duration percentiles.
    pub fn latency(&self) -> LatencySummary {
        let durations = self.durations.read();
        let ms = |p: f64| {
            durations
                .percentile(p)
                .map(|d| d.as_secs_f64() * 1000.0)
                .unwrap_or(0.0)
        };
        LatencySummary {
            p50_ms: ms(0.5),
            p95_ms: ms(0.95),
            p99_ms: ms(0.99),
            samples: durations.len(),
        }
    }

    /// Convert metrics to Prometheus text format
    pub fn to_prometheus_format(&self) -> String {
        let mut output = String::new();

        output.push_str("# TYPE bb_webhooks_deliveries_total counter\n");
        output.push_str(&format!(
            "bb_webhooks_deliveries_total {}\n",
            self.deliveries()
        ));
        output.push_str("# TYPE bb_webhooks_handled_total counter\n");
        output.push_str(&format!("bb_webhooks_handled_total {}\n", self.handled()));
        output.push_str("# TYPE bb_webhooks_failed_total counter\n");
        output.push_str(&format!("bb_webhooks_failed_total {}\n", self.failed()));

        for (event_key, count) in self.deliveries_by_event_key.read().iter() {
            output.push_str(&format!(
                "bb_webhooks_deliveries_by_event_key{{event_key=\"{}\"}} {}\n",
                event_key, count
            ));
        }
        for (kind, count) in self.failures_by_kind.read().iter() {
            output.push_str(&format!(
                "bb_webhooks_failures_by_kind{{kind=\"{}\"}} {}\n",
                kind, count
            ));
        }

        let latency = self.latency();
        if latency.samples > 0 {
            output.push_str(&format!(
                "bb_webhooks_dispatch_duration_p50_ms {:.3}\n",
                latency.p50_ms
            ));
            output.push_str(&format!(
                "bb_webhooks_dispatch_duration_p95_ms {:.3}\n",
                latency.p95_ms
            ));
            output.push_str(&format!(
                "bb_webhooks_dispatch_duration_p99_ms {:.3}\n",
                latency.p99_ms
            ));
        }

        output.push_str(&format!(
            "bb_webhooks_uptime_seconds {}\n",
            self.uptime_seconds()
        ));

        output
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
