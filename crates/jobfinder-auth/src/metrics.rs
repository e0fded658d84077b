//! Gateway outcome metrics.

use metrics::counter;

pub mod names {
    /// Authentication attempts by operation and outcome.
    pub const AUTH_ATTEMPTS_TOTAL: &str = "jobfinder_auth_attempts_total";
}

pub fn record_attempt(operation: &str, outcome: &str) {
    counter!(
        names::AUTH_ATTEMPTS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
