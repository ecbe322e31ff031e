//! Entity Identifiers
//!
//! Arena-style identifiers for agents, beliefs, and behaviours. Every entity
//! receives a stable index at registration time; relationships between
//! entities are stored as maps keyed by these identifiers instead of direct
//! references.
//!
//! # Example
//!
//! ```
//! use spread_events::BeliefId;
//!
//! let id = BeliefId::new(7);
//! assert_eq!(id.to_string(), "belief_0007");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Creates an identifier from its arena index.
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the arena index.
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{:04}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Identifier of an agent in the population.
    AgentId,
    "agent"
);

arena_id!(
    /// Identifier of a belief in the belief registry.
    BeliefId,
    "belief"
);

arena_id!(
    /// Identifier of a behaviour in the behaviour registry.
    BehaviourId,
    "behaviour"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_index() {
        let id = AgentId::new(42);
        assert_eq!(id.to_string(), "agent_0042");
        assert_eq!(id.index(), 42);
        assert_eq!(BehaviourId::new(12345).to_string(), "behaviour_12345");
    }

    #[test]
    fn test_ordering_follows_index() {
        let mut ids = vec![BeliefId::new(3), BeliefId::new(1), BeliefId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![BeliefId::new(1), BeliefId::new(2), BeliefId::new(3)]);
    }

    #[test]
    fn test_serializes_as_plain_index() {
        let json = serde_json::to_string(&BehaviourId::new(5)).unwrap();
        assert_eq!(json, "5");
        let parsed: BehaviourId = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, BehaviourId::new(5));
    }
}
