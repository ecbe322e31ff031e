//! Population
//!
//! The driver: an ECS world holding every agent as an entity, the shared
//! registries as resources, and the chained step schedule.

use bevy_ecs::prelude::*;
use bevy_tasks::{ComputeTaskPool, TaskPool};
use spread_events::{AgentId, SimTime, StepSnapshot};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::components::agent::Agent;
use crate::components::registry::{BehaviourRegistry, BeliefRegistry};
use crate::output::snapshot::build_snapshot;
use crate::systems::step::{
    advance_clock, choose_actions, record_action_ledger, update_activations, ActionLedger,
    SimClock, SimSettings,
};

pub struct Population {
    world: World,
    step_schedule: Schedule,
    prime_schedule: Schedule,
    entities: BTreeMap<AgentId, Entity>,
    by_name: HashMap<String, AgentId>,
}

impl Population {
    pub fn new(beliefs: BeliefRegistry, behaviours: BehaviourRegistry, settings: SimSettings) -> Self {
        // Parallel queries need the compute pool even outside a schedule run
        ComputeTaskPool::get_or_init(TaskPool::default);

        let mut world = World::new();
        world.insert_resource(beliefs);
        world.insert_resource(behaviours);
        world.insert_resource(settings);
        world.insert_resource(SimClock::default());
        world.insert_resource(ActionLedger::new());

        let mut step_schedule = Schedule::default();
        step_schedule.add_systems(
            (
                advance_clock,
                record_action_ledger,
                update_activations,
                choose_actions,
            )
                .chain(),
        );

        let mut prime_schedule = Schedule::default();
        prime_schedule.add_systems(choose_actions);

        Self {
            world,
            step_schedule,
            prime_schedule,
            entities: BTreeMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Spawn a new agent and return its identifier
    pub fn add_agent(&mut self, name: impl Into<String>) -> AgentId {
        let id = AgentId::new(self.entities.len() as u32);
        let agent = Agent::new(id, name);
        self.by_name.insert(agent.name().to_string(), id);
        let entity = self.world.spawn(agent).id();
        self.entities.insert(id, entity);
        id
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        let entity = self.entities.get(&id)?;
        self.world.get::<Agent>(*entity)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<Mut<'_, Agent>> {
        let entity = self.entities.get(&id)?;
        self.world.get_mut::<Agent>(*entity)
    }

    pub fn agent_by_name(&self, name: &str) -> Option<&Agent> {
        self.agent(*self.by_name.get(name)?)
    }

    /// All agents in identifier order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.entities
            .values()
            .filter_map(move |entity| self.world.get::<Agent>(*entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn beliefs(&self) -> &BeliefRegistry {
        self.world.resource::<BeliefRegistry>()
    }

    pub fn behaviours(&self) -> &BehaviourRegistry {
        self.world.resource::<BehaviourRegistry>()
    }

    pub fn settings(&self) -> SimSettings {
        *self.world.resource::<SimSettings>()
    }

    /// Current step
    pub fn now(&self) -> SimTime {
        self.world.resource::<SimClock>().now
    }

    /// Choose every agent's action at the current step (time zero) so that
    /// the first step has actions to observe
    pub fn prime(&mut self) {
        self.prime_schedule.run(&mut self.world);
        tracing::debug!(time = %self.now(), agents = self.len(), "population primed");
    }

    /// Advance by one step and return the new current step
    pub fn step(&mut self) -> SimTime {
        self.step_schedule.run(&mut self.world);
        let now = self.now();

        if tracing::enabled!(tracing::Level::DEBUG) {
            let acted = self.agents().filter(|a| a.action(now).is_some()).count();
            tracing::debug!(time = %now, acted, agents = self.len(), "step complete");
        }

        now
    }

    /// Run `steps` steps, handing the population to `observer` after each
    pub fn run<E, F>(&mut self, steps: u64, mut observer: F) -> Result<(), E>
    where
        F: FnMut(&Population) -> Result<(), E>,
    {
        for _ in 0..steps {
            self.step();
            observer(self)?;
        }
        Ok(())
    }

    /// Snapshot of the current step
    pub fn snapshot(&self, include_activations: bool) -> StepSnapshot {
        build_snapshot(self, self.now(), include_activations)
    }
}

impl fmt::Debug for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("now", &self.now())
            .field("agents", &self.len())
            .field("beliefs", &self.beliefs().len())
            .field("behaviours", &self.behaviours().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spread_events::{BehaviourId, BeliefId};

    fn two_agent_population(parallel: bool) -> (Population, BeliefId, BehaviourId, BehaviourId) {
        let mut behaviours = BehaviourRegistry::new();
        let walk = behaviours.register("walk");
        let drive = behaviours.register("drive");

        let mut beliefs = BeliefRegistry::new();
        let green = beliefs.register("green");
        let b = beliefs.get_mut(green).unwrap();
        b.set_relationship(green, 1.0);
        b.set_perception(walk, 1.0);
        b.set_perception(drive, -1.0);
        b.set_performance_relationship(walk, 1.0);
        b.set_performance_relationship(drive, -1.0);

        let mut population = Population::new(
            beliefs,
            behaviours,
            SimSettings { seed: 1, parallel },
        );
        let ada = population.add_agent("ada");
        let bo = population.add_agent("bo");

        for (id, friend, start) in [(ada, bo, 0.5), (bo, ada, 0.3)] {
            let mut agent = population.agent_mut(id).unwrap();
            agent.set_friend(friend, 1.0);
            agent.set_delta(green, 0.9);
            agent.add_known_behaviour(walk);
            agent.add_known_behaviour(drive);
            agent.set_activation(SimTime::ZERO, green, start).unwrap();
        }

        (population, green, walk, drive)
    }

    #[test]
    fn test_debug_summarises_world() {
        let (population, _, _, _) = two_agent_population(false);
        let text = format!("{:?}", population);
        assert!(text.contains("agents: 2"));
        assert!(text.contains("beliefs: 1"));
        assert!(text.contains("behaviours: 2"));
    }

    #[test]
    fn test_add_and_lookup_agents() {
        let (population, _, _, _) = two_agent_population(false);

        assert_eq!(population.len(), 2);
        assert_eq!(population.agent(AgentId::new(1)).unwrap().name(), "bo");
        assert_eq!(population.agent_by_name("ada").unwrap().id(), AgentId::new(0));
        assert!(population.agent(AgentId::new(5)).is_none());

        let names: Vec<&str> = population.agents().map(|a| a.name()).collect();
        assert_eq!(names, vec!["ada", "bo"]);
    }

    #[test]
    fn test_prime_chooses_at_time_zero() {
        let (mut population, _, walk, _) = two_agent_population(false);
        population.prime();

        assert_eq!(population.now(), SimTime::ZERO);
        // Positive green activation: walk scores positive, drive negative
        for agent in population.agents() {
            assert_eq!(agent.action(SimTime::ZERO), Some(walk));
        }
    }

    #[test]
    fn test_step_propagates_pressure() {
        let (mut population, green, _, _) = two_agent_population(false);
        population.prime();
        let now = population.step();
        assert_eq!(now, SimTime::new(1));

        // Friend walked (perception 1.0): pressure 1.0, context 0.5 for ada
        let ada = population.agent_by_name("ada").unwrap();
        let expected = (0.9 * 0.5 + 0.75 * 1.0_f64).clamp(-1.0, 1.0);
        assert_eq!(ada.activation(now, green), Some(expected));
        assert!(ada.action(now).is_some());
    }

    #[test]
    fn test_run_calls_observer_each_step() {
        let (mut population, _, _, _) = two_agent_population(true);
        population.prime();

        let mut seen = Vec::new();
        population
            .run(5, |p| {
                seen.push(p.now());
                Ok::<(), std::io::Error>(())
            })
            .unwrap();

        assert_eq!(seen, (1..=5).map(SimTime::new).collect::<Vec<_>>());
        for agent in population.agents() {
            assert_eq!(agent.actions().len(), 6);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (mut sequential, _, _, _) = two_agent_population(false);
        let (mut parallel, _, _, _) = two_agent_population(true);
        sequential.prime();
        parallel.prime();

        for _ in 0..20 {
            sequential.step();
            parallel.step();
        }

        assert_eq!(sequential.snapshot(true), parallel.snapshot(true));
    }
}
