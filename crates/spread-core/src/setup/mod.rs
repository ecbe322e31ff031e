//! World Setup
//!
//! Builds a population from a scenario description.

pub mod scenario;

pub use scenario::{AgentSpec, BeliefSpec, Scenario, ScenarioError};
