//! Agent Components
//!
//! Per-agent state: social ties, time-indexed activation table, chosen-action
//! history, per-belief deltas, and the ordered set of known behaviours.
//!
//! Both time-indexed tables only grow forwards. A write to a step earlier
//! than the latest recorded step is rejected, so a step is never altered once
//! a later one has been derived from it.

use bevy_ecs::prelude::*;
use spread_events::{AgentId, BehaviourId, BeliefId, SimTime};
use std::collections::BTreeMap;

use crate::error::AgentError;

/// Activations of one agent at one step, ordered by belief ID
pub type ActivationRow = BTreeMap<BeliefId, f64>;

/// Lower bound of an activation value
pub const MIN_ACTIVATION: f64 = -1.0;
/// Upper bound of an activation value
pub const MAX_ACTIVATION: f64 = 1.0;

/// Clamp a value into the activation range
pub fn clamp_activation(value: f64) -> f64 {
    value.clamp(MIN_ACTIVATION, MAX_ACTIVATION)
}

#[derive(Component, Debug, Clone)]
pub struct Agent {
    id: AgentId,
    name: String,
    /// Directed influence weight of each friend
    friends: BTreeMap<AgentId, f64>,
    activations: BTreeMap<SimTime, ActivationRow>,
    actions: BTreeMap<SimTime, BehaviourId>,
    /// Persistence coefficient applied to the previous activation
    deltas: BTreeMap<BeliefId, f64>,
    known_behaviours: Vec<BehaviourId>,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            friends: BTreeMap::new(),
            activations: BTreeMap::new(),
            actions: BTreeMap::new(),
            deltas: BTreeMap::new(),
            known_behaviours: Vec::new(),
        }
    }

    pub fn with_friend(mut self, friend: AgentId, weight: f64) -> Self {
        self.set_friend(friend, weight);
        self
    }

    pub fn with_delta(mut self, belief: BeliefId, delta: f64) -> Self {
        self.set_delta(belief, delta);
        self
    }

    pub fn with_known_behaviour(mut self, behaviour: BehaviourId) -> Self {
        self.add_known_behaviour(behaviour);
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- Social graph ---

    pub fn set_friend(&mut self, friend: AgentId, weight: f64) {
        self.friends.insert(friend, weight);
    }

    pub fn friends(&self) -> &BTreeMap<AgentId, f64> {
        &self.friends
    }

    // --- Deltas ---

    pub fn set_delta(&mut self, belief: BeliefId, delta: f64) {
        self.deltas.insert(belief, delta);
    }

    /// Delta for a belief (0 when unrecorded)
    pub fn delta(&self, belief: BeliefId) -> f64 {
        self.deltas.get(&belief).copied().unwrap_or(0.0)
    }

    // --- Known behaviours ---

    /// Append a behaviour unless already known; declaration order decides
    /// ties during selection
    pub fn add_known_behaviour(&mut self, behaviour: BehaviourId) {
        if !self.known_behaviours.contains(&behaviour) {
            self.known_behaviours.push(behaviour);
        }
    }

    pub fn known_behaviours(&self) -> &[BehaviourId] {
        &self.known_behaviours
    }

    // --- Activation table ---

    /// Activation of a belief at a step, or `None` when not recorded
    pub fn activation(&self, time: SimTime, belief: BeliefId) -> Option<f64> {
        self.activations.get(&time)?.get(&belief).copied()
    }

    /// All activations recorded at a step
    pub fn activations_at(&self, time: SimTime) -> Option<&ActivationRow> {
        self.activations.get(&time)
    }

    /// Latest step with recorded activations
    pub fn latest_activation_time(&self) -> Option<SimTime> {
        self.activations.keys().next_back().copied()
    }

    /// Record an activation, clamped into [-1, 1]
    pub fn set_activation(
        &mut self,
        time: SimTime,
        belief: BeliefId,
        activation: f64,
    ) -> Result<(), AgentError> {
        if let Some(latest) = self.latest_activation_time() {
            if time < latest {
                return Err(AgentError::StaleWrite {
                    table: "activation",
                    attempted: time,
                    latest,
                });
            }
        }

        self.activations
            .entry(time)
            .or_default()
            .insert(belief, clamp_activation(activation));
        Ok(())
    }

    /// Record a full row of activations for a step
    pub fn commit_activations(
        &mut self,
        time: SimTime,
        row: ActivationRow,
    ) -> Result<(), AgentError> {
        for (belief, activation) in row {
            self.set_activation(time, belief, activation)?;
        }
        Ok(())
    }

    // --- Action history ---

    /// Behaviour performed at a step
    pub fn action(&self, time: SimTime) -> Option<BehaviourId> {
        self.actions.get(&time).copied()
    }

    pub fn actions(&self) -> &BTreeMap<SimTime, BehaviourId> {
        &self.actions
    }

    pub fn latest_action_time(&self) -> Option<SimTime> {
        self.actions.keys().next_back().copied()
    }

    /// Record the behaviour performed at a step; at most one per step
    pub fn set_action(&mut self, time: SimTime, behaviour: BehaviourId) -> Result<(), AgentError> {
        if let Some(latest) = self.latest_action_time() {
            if time == latest {
                return Err(AgentError::ActionAlreadyRecorded(time));
            }
            if time < latest {
                return Err(AgentError::StaleWrite {
                    table: "action",
                    attempted: time,
                    latest,
                });
            }
        }

        self.actions.insert(time, behaviour);
        Ok(())
    }
}
