//! Identity Toolkit request metrics.

use metrics::{counter, histogram};

pub mod names {
    /// Identity provider calls by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "identity_requests_total";

    /// Call latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "identity_latency_seconds";
}

/// Record metrics for a completed identity request.
pub fn record_request(operation: &str, outcome: &str, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}
