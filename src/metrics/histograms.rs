//! Histogram metrics

use super::labels;

/// Record connect duration
pub fn connect_duration(entry_point: &'static str, duration_ms: u64) {
    metrics::histogram!(labels::CONNECT_DURATION, labels::ENTRY_POINT => entry_point)
        .record(duration_ms as f64);
}

/// Record verification duration
pub fn verify_duration(entry_point: &'static str, duration_ms: u64) {
    metrics::histogram!(labels::VERIFY_DURATION, labels::ENTRY_POINT => entry_point)
        .record(duration_ms as f64);
}
