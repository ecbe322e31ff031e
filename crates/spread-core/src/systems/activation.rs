//! Activation Update Engine
//!
//! Computes an agent's activation for each belief from its previous value,
//! social pressure from friends' last actions, and contextual reinforcement
//! from the agent's other beliefs.
//!
//! Every mean below iterates a `BTreeMap`, so summation order is ascending by
//! identifier and results are reproducible bit for bit.

use spread_events::{AgentId, BehaviourId, BeliefId, SimTime};

use crate::components::agent::{clamp_activation, ActivationRow, Agent};
use crate::components::belief::Belief;
use crate::components::registry::BeliefRegistry;
use crate::error::AgentError;

/// Read access to what other agents did at a given step
pub trait ActionLookup {
    fn action_of(&self, agent: AgentId, time: SimTime) -> Option<BehaviourId>;
}

impl ActionLookup for [Agent] {
    fn action_of(&self, agent: AgentId, time: SimTime) -> Option<BehaviourId> {
        self.iter().find(|a| a.id() == agent)?.action(time)
    }
}

impl ActionLookup for Vec<Agent> {
    fn action_of(&self, agent: AgentId, time: SimTime) -> Option<BehaviourId> {
        self.as_slice().action_of(agent, time)
    }
}

/// Mean of a sequence, 0 for an empty one
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Activation of `b1` at `time` scaled by its relationship to `b2`
pub fn weighted_relationship(agent: &Agent, b1: &Belief, b2: BeliefId, time: SimTime) -> f64 {
    let activation = agent.activation(time, b1.id).unwrap_or(0.0);
    activation * b1.relationship(b2)
}

/// Mean weighted relationship between `belief` and every belief the agent
/// holds an activation for at `time`
pub fn contextualise(agent: &Agent, belief: &Belief, time: SimTime) -> f64 {
    let Some(row) = agent.activations_at(time) else {
        return 0.0;
    };

    mean(
        row.keys()
            .map(|&other| weighted_relationship(agent, belief, other, time)),
    )
}

/// Mean over friends of friendship weight times how `belief` perceives the
/// behaviour that friend performed at `time`
pub fn pressure<L>(agent: &Agent, belief: &Belief, time: SimTime, actions: &L) -> f64
where
    L: ActionLookup + ?Sized,
{
    mean(agent.friends().iter().map(|(&friend, &weight)| {
        let perception = actions
            .action_of(friend, time)
            .map(|behaviour| belief.perception(behaviour))
            .unwrap_or(0.0);
        weight * perception
    }))
}

/// Pressure modulated by how coherent the belief is with the agent's context
///
/// Positive pressure is amplified by high context, non-positive pressure by
/// low context. The sign of the pressure is never reversed.
pub fn activation_change<L>(agent: &Agent, belief: &Belief, time: SimTime, actions: &L) -> f64
where
    L: ActionLookup + ?Sized,
{
    let pressure = pressure(agent, belief, time, actions);
    let context = contextualise(agent, belief, time);

    let weight = if pressure > 0.0 {
        (1.0 + context) / 2.0
    } else {
        (1.0 - context) / 2.0
    };

    weight * pressure
}

/// Activation of `belief` at `time`, derived from data at `time - 1`
///
/// Returns `None` when there is no previous step or the agent held no
/// activation for the belief at the previous step.
pub fn next_activation<L>(agent: &Agent, belief: &Belief, time: SimTime, actions: &L) -> Option<f64>
where
    L: ActionLookup + ?Sized,
{
    let previous_time = time.prev()?;
    let previous = agent.activation(previous_time, belief.id)?;
    let change = activation_change(agent, belief, previous_time, actions);

    Some(clamp_activation(agent.delta(belief.id) * previous + change))
}

/// Compute the activation row at `time` for every belief held at `time - 1`
///
/// Beliefs missing from the registry are skipped.
pub fn next_activations<L>(
    agent: &Agent,
    registry: &BeliefRegistry,
    time: SimTime,
    actions: &L,
) -> ActivationRow
where
    L: ActionLookup + ?Sized,
{
    let Some(previous_time) = time.prev() else {
        return ActivationRow::new();
    };
    let Some(previous_row) = agent.activations_at(previous_time) else {
        return ActivationRow::new();
    };

    previous_row
        .keys()
        .filter_map(|&id| {
            let Some(belief) = registry.get(id) else {
                tracing::trace!(agent = %agent.id(), belief = %id, "belief not registered, skipping");
                return None;
            };
            next_activation(agent, belief, time, actions).map(|value| (id, value))
        })
        .collect()
}

/// Update a single belief's activation at `time`; returns whether it was updated
pub fn update_activation<L>(
    agent: &mut Agent,
    belief: &Belief,
    time: SimTime,
    actions: &L,
) -> Result<bool, AgentError>
where
    L: ActionLookup + ?Sized,
{
    match next_activation(agent, belief, time, actions) {
        Some(value) => {
            agent.set_activation(time, belief.id, value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Update every belief the agent held at `time - 1`; returns the number updated
///
/// All new values are computed from the previous step before any is written.
pub fn update_activations_for_all_beliefs<L>(
    agent: &mut Agent,
    registry: &BeliefRegistry,
    time: SimTime,
    actions: &L,
) -> Result<usize, AgentError>
where
    L: ActionLookup + ?Sized,
{
    let row = next_activations(agent, registry, time, actions);
    let updated = row.len();
    agent.commit_activations(time, row)?;
    Ok(updated)
}
