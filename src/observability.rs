//! Resolution counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the resolver on every open attempt
#[derive(Debug, Default)]
pub struct Metrics {
    opens_attempted: AtomicU64,
    opens_succeeded: AtomicU64,
    parse_failures: AtomicU64,
    unsupported_scheme: AtomicU64,
    driver_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_attempted(&self) {
        self.opens_attempted.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "opens_attempted", "Metric incremented");
    }

    pub fn open_succeeded(&self) {
        self.opens_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "opens_succeeded", "Metric incremented");
    }

    pub fn parse_failed(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "parse_failures", "Metric incremented");
    }

    pub fn unsupported_scheme(&self) {
        self.unsupported_scheme.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "unsupported_scheme", "Metric incremented");
    }

    pub fn driver_failed(&self) {
        self.driver_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "driver_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            opens_attempted: self.opens_attempted.load(Ordering::Relaxed),
            opens_succeeded: self.opens_succeeded.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            unsupported_scheme: self.unsupported_scheme.load(Ordering::Relaxed),
            driver_failures: self.driver_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub opens_attempted: u64,
    pub opens_succeeded: u64,
    pub parse_failures: u64,
    pub unsupported_scheme: u64,
    pub driver_failures: u64,
}
