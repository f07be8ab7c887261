//! Metric names and label values

/// Tests started
pub const TESTS_STARTED: &str = "mongo_connectivity_tests_started_total";
/// Tests that printed the success line
pub const TESTS_SUCCEEDED: &str = "mongo_connectivity_tests_succeeded_total";
/// Tests that failed, by stage
pub const TESTS_FAILED: &str = "mongo_connectivity_tests_failed_total";
/// Time from connect call to open handle
pub const CONNECT_DURATION: &str = "mongo_connectivity_connect_duration_ms";
/// Time spent in the status command, close included
pub const VERIFY_DURATION: &str = "mongo_connectivity_verify_duration_ms";

/// Label key for the entry point
pub const ENTRY_POINT: &str = "entry_point";
/// Label key for the failure stage
pub const STAGE: &str = "stage";
/// Label key for the error category
pub const ERROR_CATEGORY: &str = "error_category";

/// Failure while building the connection target
pub const STAGE_CONSTRUCTION: &str = "construction";
/// Failure while connecting
pub const STAGE_CONNECT: &str = "connect";
/// Status command failed
pub const STAGE_COMMAND: &str = "command";
/// Failure while closing
pub const STAGE_CLOSE: &str = "close";
