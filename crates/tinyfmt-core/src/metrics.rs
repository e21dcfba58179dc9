//! Atomic counters for formatter observability.
//!
//! All counters use relaxed ordering. They are advisory, not
//! synchronization primitives.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global formatter counters.
#[derive(Debug)]
pub struct FormatMetrics {
    /// Formatting calls started.
    pub calls: AtomicU64,
    /// Bytes accepted by sinks.
    pub bytes_written: AtomicU64,
    /// Buffer flushes handed to a sink.
    pub flushes: AtomicU64,
    /// Sink writes that failed and aborted a call.
    pub sink_failures: AtomicU64,
    /// Unrecognised conversion characters rendered literally.
    pub malformed_specifiers: AtomicU64,
    /// `%s` arguments that were null and rendered as `(null)`.
    pub null_strings: AtomicU64,
    /// Arguments repaired under the hardened policy.
    pub argument_repairs: AtomicU64,
    /// Calls rejected by the strict argument check.
    pub argument_errors: AtomicU64,
}

impl FormatMetrics {
    /// Create a new zeroed metrics instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            malformed_specifiers: AtomicU64::new(0),
            null_strings: AtomicU64::new(0),
            argument_repairs: AtomicU64::new(0),
            argument_errors: AtomicU64::new(0),
        }
    }

    /// Increment a counter by 1.
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment a counter by `n`.
    pub fn add(counter: &AtomicU64, n: u64) {
        if n != 0 {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Read a counter value.
    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: Self::get(&self.calls),
            bytes_written: Self::get(&self.bytes_written),
            flushes: Self::get(&self.flushes),
            sink_failures: Self::get(&self.sink_failures),
            malformed_specifiers: Self::get(&self.malformed_specifiers),
            null_strings: Self::get(&self.null_strings),
            argument_repairs: Self::get(&self.argument_repairs),
            argument_errors: Self::get(&self.argument_errors),
        }
    }
}

impl Default for FormatMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of all formatter counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub calls: u64,
    pub bytes_written: u64,
    pub flushes: u64,
    pub sink_failures: u64,
    pub malformed_specifiers: u64,
    pub null_strings: u64,
    pub argument_repairs: u64,
    pub argument_errors: u64,
}

static GLOBAL_METRICS: FormatMetrics = FormatMetrics::new();

/// Access the global metrics singleton.
#[must_use]
pub fn global_metrics() -> &'static FormatMetrics {
    &GLOBAL_METRICS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let m = FormatMetrics::new();
        assert_eq!(m.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn increment_and_add() {
        let m = FormatMetrics::new();
        FormatMetrics::inc(&m.calls);
        FormatMetrics::inc(&m.calls);
        FormatMetrics::add(&m.bytes_written, 40);
        FormatMetrics::add(&m.bytes_written, 0);
        let snap = m.snapshot();
        assert_eq!(snap.calls, 2);
        assert_eq!(snap.bytes_written, 40);
        assert_eq!(snap.flushes, 0);
    }
}
