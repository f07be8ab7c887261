//! Counter metrics

use super::labels;

/// Record a test start
pub fn test_started(entry_point: &'static str) {
    metrics::counter!(labels::TESTS_STARTED, labels::ENTRY_POINT => entry_point).increment(1);
}

/// Record a successful test
pub fn test_succeeded(entry_point: &'static str) {
    metrics::counter!(labels::TESTS_SUCCEEDED, labels::ENTRY_POINT => entry_point).increment(1);
}

/// Record a failed test
pub fn test_failed(entry_point: &'static str, stage: &'static str, error_category: &'static str) {
    metrics::counter!(
        labels::TESTS_FAILED,
        labels::ENTRY_POINT => entry_point,
        labels::STAGE => stage,
        labels::ERROR_CATEGORY => error_category
    )
    .increment(1);
}
