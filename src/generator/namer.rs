//! Deterministic metric naming.
//!
//! Names are a pure function of configuration and the current metric cycle.
//! Because the cycle and index are separate underscore-delimited tokens, the
//! full name set for one cycle never overlaps another cycle's set: the same
//! index under a new cycle is a distinct metric identity, which is exactly the
//! metric churn being modeled.

/// Build the metric name for one (cycle, index) pair.
pub fn metric_name(prefix: &str, length: usize, cycle: u64, index: usize) -> String {
    format!("{}_metric_{}_{}_{}", prefix, "m".repeat(length), cycle, index)
}
