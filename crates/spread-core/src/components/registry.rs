//! Entity Registries
//!
//! Arena storage for beliefs and behaviours. Registration assigns the next
//! index as the entity's identifier; entities are never removed, so an
//! identifier stays valid for the lifetime of the registry.

use bevy_ecs::prelude::*;
use spread_events::{BehaviourId, BeliefId};
use std::collections::HashMap;

use super::behaviour::Behaviour;
use super::belief::Belief;

/// Registry of all beliefs, shared read-only with the engines
#[derive(Resource, Debug, Clone, Default)]
pub struct BeliefRegistry {
    beliefs: Vec<Belief>,
    by_name: HashMap<String, BeliefId>,
}

impl BeliefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new belief and return its identifier
    pub fn register(&mut self, name: impl Into<String>) -> BeliefId {
        let id = BeliefId::new(self.beliefs.len() as u32);
        let belief = Belief::new(id, name);
        tracing::trace!(%id, uuid = %belief.uuid, name = %belief.name, "belief registered");
        self.by_name.insert(belief.name.clone(), id);
        self.beliefs.push(belief);
        id
    }

    /// Get a belief by ID
    pub fn get(&self, id: BeliefId) -> Option<&Belief> {
        self.beliefs.get(id.index())
    }

    /// Get mutable belief by ID
    pub fn get_mut(&mut self, id: BeliefId) -> Option<&mut Belief> {
        self.beliefs.get_mut(id.index())
    }

    /// Look up a belief ID by display name
    pub fn id_of(&self, name: &str) -> Option<BeliefId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BeliefId) -> Option<&str> {
        self.get(id).map(|b| b.name.as_str())
    }

    /// All beliefs in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Belief> {
        self.beliefs.iter()
    }

    pub fn len(&self) -> usize {
        self.beliefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beliefs.is_empty()
    }
}

/// Registry of all behaviours
#[derive(Resource, Debug, Clone, Default)]
pub struct BehaviourRegistry {
    behaviours: Vec<Behaviour>,
    by_name: HashMap<String, BehaviourId>,
}

impl BehaviourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new behaviour and return its identifier
    pub fn register(&mut self, name: impl Into<String>) -> BehaviourId {
        let id = BehaviourId::new(self.behaviours.len() as u32);
        let behaviour = Behaviour::new(id, name);
        tracing::trace!(%id, uuid = %behaviour.uuid, name = %behaviour.name, "behaviour registered");
        self.by_name.insert(behaviour.name.clone(), id);
        self.behaviours.push(behaviour);
        id
    }

    pub fn get(&self, id: BehaviourId) -> Option<&Behaviour> {
        self.behaviours.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<BehaviourId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BehaviourId) -> Option<&str> {
        self.get(id).map(|b| b.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Behaviour> {
        self.behaviours.iter()
    }

    pub fn len(&self) -> usize {
        self.behaviours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviours.is_empty()
    }
}
