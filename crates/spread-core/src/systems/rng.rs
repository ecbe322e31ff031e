//! Per-Agent Random Streams
//!
//! Each (run seed, agent, step) triple gets its own `SmallRng`, so the draw an
//! agent makes never depends on how many draws other agents made before it.
//! Sequential and parallel evaluation therefore choose identically.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use spread_events::{AgentId, SimTime};

/// Fold one component into a running seed by drawing from a `SmallRng`
/// seeded with both
fn fold(seed: u64, part: u64) -> u64 {
    SmallRng::seed_from_u64(seed ^ part).gen()
}

/// Derive the seed for one agent at one step
///
/// Agent and step are folded in separately, so swapping them yields a
/// different stream.
pub fn stream_seed(seed: u64, agent: AgentId, time: SimTime) -> u64 {
    let root = fold(seed, 0);
    fold(fold(root, u64::from(agent.0)), time.step())
}

/// Random source for one agent at one step
pub fn agent_step_rng(seed: u64, agent: AgentId, time: SimTime) -> SmallRng {
    SmallRng::seed_from_u64(stream_seed(seed, agent, time))
}
