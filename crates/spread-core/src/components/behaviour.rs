//! Behaviour
//!
//! An observable action an agent can perform. Behaviours carry no state
//! beyond their identity.

use spread_events::BehaviourId;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Behaviour {
    pub id: BehaviourId,
    pub uuid: Uuid,
    pub name: String,
}

impl Behaviour {
    /// Create a behaviour with a fresh UUID
    pub fn new(id: BehaviourId, name: impl Into<String>) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
