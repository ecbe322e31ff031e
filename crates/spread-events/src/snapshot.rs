//! Snapshot Types
//!
//! Serialization structs for per-step output and end-of-run summaries.
//!
//! Entities are reported by display name rather than arena index so that the
//! output can be read without the registries that produced it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::SimTime;

/// State of one agent at one time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub name: String,
    /// Behaviour performed at this step, if the agent acted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Activation per belief name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub activations: BTreeMap<String, f64>,
}

/// State of the whole population at one time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub time: SimTime,
    pub agents: Vec<AgentSnapshot>,
    /// Number of agents performing each behaviour at this step
    #[serde(default)]
    pub action_counts: BTreeMap<String, u32>,
}

impl StepSnapshot {
    /// Serializes to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a snapshot from a single JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Returns the snapshot of the named agent.
    pub fn agent(&self, name: &str) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.name == name)
    }
}

/// Aggregate statistics over a complete run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: u64,
    pub agent_count: usize,
    /// Total number of times each behaviour was performed
    pub action_totals: BTreeMap<String, u64>,
    /// Mean activation per belief across all agents and reported steps
    pub mean_activations: BTreeMap<String, f64>,
}

impl RunSummary {
    /// Returns the share of all recorded actions taken by a behaviour.
    pub fn action_share(&self, behaviour: &str) -> f64 {
        let total: u64 = self.action_totals.values().sum();
        if total == 0 {
            return 0.0;
        }
        self.action_totals.get(behaviour).copied().unwrap_or(0) as f64 / total as f64
    }
}
