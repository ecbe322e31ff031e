//! Belief
//!
//! A belief is a static lookup table describing how it relates to other
//! beliefs, how it perceives behaviours, and how strongly holding it predicts
//! performing each behaviour. All maps are sparse: an absent entry is a
//! weight of zero.

use spread_events::{BehaviourId, BeliefId};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Belief {
    pub id: BeliefId,
    pub uuid: Uuid,
    pub name: String,
    /// Signed reinforcement (positive) or conflict (negative) with other beliefs
    relationships: BTreeMap<BeliefId, f64>,
    /// How performing a behaviour is perceived by holders of this belief
    perceptions: BTreeMap<BehaviourId, f64>,
    /// How strongly holding this belief predicts performing a behaviour
    performance_relationships: BTreeMap<BehaviourId, f64>,
}

impl Belief {
    /// Create a belief with a fresh UUID and empty relationship tables
    pub fn new(id: BeliefId, name: impl Into<String>) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name: name.into(),
            relationships: BTreeMap::new(),
            perceptions: BTreeMap::new(),
            performance_relationships: BTreeMap::new(),
        }
    }

    pub fn with_relationship(mut self, other: BeliefId, weight: f64) -> Self {
        self.set_relationship(other, weight);
        self
    }

    pub fn with_perception(mut self, behaviour: BehaviourId, weight: f64) -> Self {
        self.set_perception(behaviour, weight);
        self
    }

    pub fn with_performance_relationship(mut self, behaviour: BehaviourId, weight: f64) -> Self {
        self.set_performance_relationship(behaviour, weight);
        self
    }

    pub fn set_relationship(&mut self, other: BeliefId, weight: f64) {
        self.relationships.insert(other, weight);
    }

    pub fn set_perception(&mut self, behaviour: BehaviourId, weight: f64) {
        self.perceptions.insert(behaviour, weight);
    }

    pub fn set_performance_relationship(&mut self, behaviour: BehaviourId, weight: f64) {
        self.performance_relationships.insert(behaviour, weight);
    }

    /// Relationship weight towards another belief (0 when unrecorded)
    pub fn relationship(&self, other: BeliefId) -> f64 {
        self.relationships.get(&other).copied().unwrap_or(0.0)
    }

    /// Perception of a behaviour (0 when unrecorded)
    pub fn perception(&self, behaviour: BehaviourId) -> f64 {
        self.perceptions.get(&behaviour).copied().unwrap_or(0.0)
    }

    /// Performance relationship with a behaviour (0 when unrecorded)
    pub fn performance_relationship(&self, behaviour: BehaviourId) -> f64 {
        self.performance_relationships
            .get(&behaviour)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn relationships(&self) -> &BTreeMap<BeliefId, f64> {
        &self.relationships
    }

    pub fn perceptions(&self) -> &BTreeMap<BehaviourId, f64> {
        &self.perceptions
    }

    pub fn performance_relationships(&self) -> &BTreeMap<BehaviourId, f64> {
        &self.performance_relationships
    }
}
