//! Error Types
//!
//! The engines never fail on numeric input; errors arise only from
//! out-of-order table writes, scenario resolution, configuration, and I/O.

use spread_events::SimTime;
use thiserror::Error;

use crate::config::ConfigError;
use crate::setup::ScenarioError;

/// Rejected writes to an agent's time-indexed tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// A write targeted a step earlier than one already recorded
    #[error("cannot write {table} at {attempted}: already recorded up to {latest}")]
    StaleWrite {
        table: &'static str,
        attempted: SimTime,
        latest: SimTime,
    },
    /// An action was already recorded for this step
    #[error("an action is already recorded at {0}")]
    ActionAlreadyRecorded(SimTime),
}

/// Top-level error for running a simulation end to end
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
