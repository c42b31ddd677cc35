// src/constants.rs

/// Achievement months run 1..=12
pub const MONTHS_PER_YEAR: u8 = 12;

/// Upper bound for an activity weight and for a category budget (percent)
pub const MAX_PERCENT: f64 = 100.0;

/// Slack for float comparison when summing weights against a budget
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Maximum plan business key length
pub const MAX_PLAN_KEY_LEN: usize = 64;

/// Maximum name length for activities, categories, departments and owners
pub const MAX_NAME_LEN: usize = 200;

/// Maximum evidence file name length
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Root prefix of evidence objects in the blob store
pub const EVIDENCE_PREFIX: &str = "evidence";

/// Maximum request frame accepted by the host (1 MiB)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Maximum evidence file size accepted by the host (10 MiB)
pub const MAX_EVIDENCE_BYTES: u64 = 10 * 1024 * 1024;
