//! Belief and behaviour diffusion over a social network.
//!
//! Agents hold activations towards beliefs that move under peer pressure and
//! reinforcement between beliefs; each step every agent picks one behaviour
//! according to how strongly its active beliefs endorse it.

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod population;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use error::{AgentError, SimError};
pub use population::Population;
pub use setup::{Scenario, ScenarioError};
pub use systems::{ActionLookup, SimSettings};

pub use spread_events::{AgentId, BehaviourId, BeliefId, SimTime};
