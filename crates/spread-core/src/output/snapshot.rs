//! Snapshot Building
//!
//! Converts agent state at one step into the name-keyed records of
//! `spread_events`.

use spread_events::{AgentSnapshot, SimTime, StepSnapshot};
use std::collections::BTreeMap;

use crate::population::Population;

/// Build the snapshot of every agent at `time`
pub fn build_snapshot(population: &Population, time: SimTime, include_activations: bool) -> StepSnapshot {
    let beliefs = population.beliefs();
    let behaviours = population.behaviours();

    let mut action_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut agents = Vec::with_capacity(population.len());

    for agent in population.agents() {
        let action = agent
            .action(time)
            .and_then(|id| behaviours.name_of(id))
            .map(str::to_string);

        if let Some(name) = &action {
            *action_counts.entry(name.clone()).or_insert(0) += 1;
        }

        let activations = if include_activations {
            agent
                .activations_at(time)
                .map(|row| {
                    row.iter()
                        .filter_map(|(&id, &value)| {
                            beliefs.name_of(id).map(|name| (name.to_string(), value))
                        })
                        .collect()
                })
                .unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        agents.push(AgentSnapshot {
            agent_id: agent.id().to_string(),
            name: agent.name().to_string(),
            action,
            activations,
        });
    }

    StepSnapshot {
        time,
        agents,
        action_counts,
    }
}
