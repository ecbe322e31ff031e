//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // spread-events = { path = "../spread-events", features = ["test-fixtures"] }
//!
//! use spread_events::fixtures;
//!
//! let steps = fixtures::sample_steps();
//! ```

use crate::StepSnapshot;

/// Returns sample step snapshots from the fixtures file.
///
/// Contains 3 steps of a two-agent, two-behaviour run:
/// - step 0: both agents walk
/// - step 1: one agent switches to driving
/// - step 2: both agents drive
pub fn sample_steps() -> Vec<StepSnapshot> {
    let jsonl = include_str!("../tests/fixtures/sample_steps.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            StepSnapshot::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse step line: {}\nError: {}", l, e)
            })
        })
        .collect()
}
