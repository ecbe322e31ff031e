//! ECS Components
//!
//! Static entities (beliefs, behaviours), their registries, and the per-agent
//! state component.

pub mod agent;
pub mod behaviour;
pub mod belief;
pub mod registry;

pub use agent::*;
pub use behaviour::*;
pub use belief::*;
pub use registry::*;
