//! Shared identifier, time, and output types for the diffusion simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod ids;
pub mod snapshot;
pub mod time;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export identifier types
pub use ids::{AgentId, BehaviourId, BeliefId};

// Re-export time types
pub use time::SimTime;

// Re-export snapshot types
pub use snapshot::{AgentSnapshot, RunSummary, StepSnapshot};
