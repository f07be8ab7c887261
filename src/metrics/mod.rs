//! Metrics for connectivity tests
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! host process installs a recorder.

pub mod counters;
pub mod histograms;
pub mod labels;
