//! Run Statistics
//!
//! Accumulates action totals and mean activations over every step of a run.

use spread_events::{RunSummary, StepSnapshot};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    seed: u64,
    last_step: u64,
    agent_count: usize,
    action_totals: BTreeMap<String, u64>,
    /// (sum, count) of activations per belief name
    activation_sums: BTreeMap<String, (f64, u64)>,
}

impl RunStats {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Fold one step into the totals
    pub fn record(&mut self, snapshot: &StepSnapshot) {
        self.last_step = self.last_step.max(snapshot.time.step());
        self.agent_count = self.agent_count.max(snapshot.agents.len());

        for (behaviour, &count) in &snapshot.action_counts {
            *self.action_totals.entry(behaviour.clone()).or_insert(0) += u64::from(count);
        }

        for agent in &snapshot.agents {
            for (belief, &value) in &agent.activations {
                let entry = self.activation_sums.entry(belief.clone()).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            steps: self.last_step,
            agent_count: self.agent_count,
            action_totals: self.action_totals.clone(),
            mean_activations: self
                .activation_sums
                .iter()
                .filter(|(_, (_, n))| *n > 0)
                .map(|(name, (sum, n))| (name.clone(), sum / *n as f64))
                .collect(),
        }
    }
}
