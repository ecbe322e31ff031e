//! Output
//!
//! Step snapshots, the JSONL snapshot logger, run statistics, and the
//! reporter tying them together.

pub mod logger;
pub mod report;
pub mod snapshot;
pub mod stats;

pub use logger::SnapshotLogger;
pub use report::RunReporter;
pub use snapshot::build_snapshot;
pub use stats::RunStats;
