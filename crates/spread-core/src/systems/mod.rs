//! ECS Systems
//!
//! The activation and action-selection engines, the sampling primitive they
//! share, per-agent random streams, and the step systems that drive them.

pub mod activation;
pub mod rng;
pub mod sampling;
pub mod selection;
pub mod step;

pub use activation::{
    activation_change, contextualise, next_activation, next_activations, pressure,
    update_activation, update_activations_for_all_beliefs, weighted_relationship, ActionLookup,
};
pub use rng::{agent_step_rng, stream_seed};
pub use sampling::{normalize, walk, Weighted};
pub use selection::{
    choose_action, score_behaviour, score_behaviours, select_behaviour, ScoredBehaviour,
};
pub use step::{
    advance_clock, choose_actions, record_action_ledger, update_activations, ActionLedger,
    SimClock, SimSettings,
};
