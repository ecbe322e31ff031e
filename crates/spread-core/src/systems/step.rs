//! Step Systems
//!
//! ECS resources and systems that advance the population by one step. The
//! systems are chained, and each chain link acts as a barrier:
//!
//! 1. `advance_clock`: move to the next step `t`
//! 2. `record_action_ledger`: freeze every agent's action at `t - 1`
//! 3. `update_activations`: every agent computes its activations at `t`
//! 4. `choose_actions`: every agent picks its behaviour at `t`
//!
//! Within steps 3 and 4 each agent reads only committed state and writes only
//! its own tables, so agents run in parallel when enabled.

use bevy_ecs::prelude::*;
use spread_events::{AgentId, BehaviourId, SimTime};
use std::collections::BTreeMap;

use crate::components::agent::Agent;
use crate::components::registry::BeliefRegistry;

use super::activation::{update_activations_for_all_beliefs, ActionLookup};
use super::rng::agent_step_rng;
use super::selection::choose_action;

/// Current simulation step
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimClock {
    pub now: SimTime,
}

/// Run-wide settings read by the step systems
#[derive(Resource, Debug, Clone, Copy)]
pub struct SimSettings {
    /// Root seed for every per-agent random stream
    pub seed: u64,
    /// Evaluate agents in parallel within a step
    pub parallel: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            parallel: true,
        }
    }
}

/// Actions every agent committed at the previous step
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionLedger {
    time: Option<SimTime>,
    actions: BTreeMap<AgentId, BehaviourId>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh ledger for `time`
    pub fn reset(&mut self, time: SimTime) {
        self.time = Some(time);
        self.actions.clear();
    }

    pub fn clear(&mut self) {
        self.time = None;
        self.actions.clear();
    }

    pub fn record(&mut self, agent: AgentId, behaviour: BehaviourId) {
        self.actions.insert(agent, behaviour);
    }

    /// Step the ledger describes
    pub fn time(&self) -> Option<SimTime> {
        self.time
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ActionLookup for ActionLedger {
    fn action_of(&self, agent: AgentId, time: SimTime) -> Option<BehaviourId> {
        if self.time != Some(time) {
            return None;
        }
        self.actions.get(&agent).copied()
    }
}

/// System: advance the clock by one step
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.now = clock.now.next();
}

/// System: snapshot every agent's action at the previous step
pub fn record_action_ledger(
    clock: Res<SimClock>,
    mut ledger: ResMut<ActionLedger>,
    agents: Query<&Agent>,
) {
    let Some(previous) = clock.now.prev() else {
        ledger.clear();
        return;
    };

    ledger.reset(previous);
    for agent in agents.iter() {
        if let Some(behaviour) = agent.action(previous) {
            ledger.record(agent.id(), behaviour);
        }
    }
}

fn update_agent(agent: &mut Agent, registry: &BeliefRegistry, ledger: &ActionLedger, time: SimTime) {
    if let Err(e) = update_activations_for_all_beliefs(agent, registry, time, ledger) {
        tracing::warn!(agent = %agent.id(), %time, "activation update rejected: {}", e);
    }
}

fn choose_for_agent(agent: &mut Agent, registry: &BeliefRegistry, seed: u64, time: SimTime) {
    let mut rng = agent_step_rng(seed, agent.id(), time);
    if let Err(e) = choose_action(agent, registry, time, &mut rng) {
        tracing::warn!(agent = %agent.id(), %time, "action rejected: {}", e);
    }
}

/// System: update every agent's activations at the current step
pub fn update_activations(
    clock: Res<SimClock>,
    settings: Res<SimSettings>,
    registry: Res<BeliefRegistry>,
    ledger: Res<ActionLedger>,
    mut agents: Query<&mut Agent>,
) {
    let time = clock.now;
    let registry: &BeliefRegistry = &registry;
    let ledger: &ActionLedger = &ledger;

    if settings.parallel {
        agents
            .par_iter_mut()
            .for_each(|mut agent| update_agent(&mut agent, registry, ledger, time));
    } else {
        for mut agent in agents.iter_mut() {
            update_agent(&mut agent, registry, ledger, time);
        }
    }
}

/// System: every agent chooses its behaviour at the current step
pub fn choose_actions(
    clock: Res<SimClock>,
    settings: Res<SimSettings>,
    registry: Res<BeliefRegistry>,
    mut agents: Query<&mut Agent>,
) {
    let time = clock.now;
    let seed = settings.seed;
    let registry: &BeliefRegistry = &registry;

    if settings.parallel {
        agents
            .par_iter_mut()
            .for_each(|mut agent| choose_for_agent(&mut agent, registry, seed, time));
    } else {
        for mut agent in agents.iter_mut() {
            choose_for_agent(&mut agent, registry, seed, time);
        }
    }
}
