//! Action Selection Engine
//!
//! Scores every known behaviour against the agent's current activations and
//! picks one:
//! - all scores negative: the highest score, deterministically
//! - exactly one non-negative score: that behaviour, deterministically
//! - otherwise: a weighted draw over the non-negative scores, walked in
//!   ascending score order

use rand::Rng;
use spread_events::{BehaviourId, SimTime};
use std::cmp::Ordering;

use crate::components::agent::Agent;
use crate::components::registry::BeliefRegistry;
use crate::error::AgentError;

use super::sampling::{self, Weighted};

/// A behaviour paired with its endorsement score
pub type ScoredBehaviour = Weighted<BehaviourId>;

/// Endorsement of a behaviour by the agent's activations at `time`
pub fn score_behaviour(
    agent: &Agent,
    registry: &BeliefRegistry,
    behaviour: BehaviourId,
    time: SimTime,
) -> f64 {
    let Some(row) = agent.activations_at(time) else {
        return 0.0;
    };

    row.iter()
        .map(|(&id, &activation)| {
            registry
                .get(id)
                .map(|belief| belief.performance_relationship(behaviour) * activation)
                .unwrap_or(0.0)
        })
        .sum()
}

/// Sort key placing NaN below every number
fn rank(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Score every known behaviour, stable-sorted ascending
///
/// Equal scores keep the agent's declaration order. NaN scores sort first
/// and never pass the non-negative filter.
pub fn score_behaviours(
    agent: &Agent,
    registry: &BeliefRegistry,
    time: SimTime,
) -> Vec<ScoredBehaviour> {
    let mut scored: Vec<ScoredBehaviour> = agent
        .known_behaviours()
        .iter()
        .map(|&behaviour| {
            Weighted::new(behaviour, score_behaviour(agent, registry, behaviour, time))
        })
        .collect();

    scored.sort_by(|a, b| {
        rank(a.weight)
            .partial_cmp(&rank(b.weight))
            .unwrap_or(Ordering::Equal)
    });
    scored
}

/// Pick a behaviour from an ascending score list
///
/// The random source is consulted only when more than one score is
/// non-negative.
pub fn select_behaviour<R: Rng + ?Sized>(
    scored: &[ScoredBehaviour],
    rng: &mut R,
) -> Option<BehaviourId> {
    let best = scored.last()?;

    if best.weight < 0.0 {
        return Some(best.item);
    }

    let candidates: Vec<ScoredBehaviour> = scored
        .iter()
        .copied()
        .filter(|s| s.weight >= 0.0)
        .collect();

    if let [only] = candidates.as_slice() {
        return Some(only.item);
    }

    let probabilities = sampling::normalize(&candidates);
    let draw: f64 = rng.gen();
    sampling::walk(&probabilities, draw)
}

/// Choose and record the agent's behaviour at `time`
///
/// Returns `Ok(None)` without recording anything when the agent knows no
/// behaviours.
pub fn choose_action<R: Rng + ?Sized>(
    agent: &mut Agent,
    registry: &BeliefRegistry,
    time: SimTime,
    rng: &mut R,
) -> Result<Option<BehaviourId>, AgentError> {
    let scored = score_behaviours(agent, registry, time);

    let Some(chosen) = select_behaviour(&scored, rng) else {
        tracing::trace!(agent = %agent.id(), %time, "no known behaviours, nothing chosen");
        return Ok(None);
    };

    agent.set_action(time, chosen)?;
    Ok(Some(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::registry::BehaviourRegistry;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use spread_events::{AgentId, BeliefId};

    /// One belief at activation 1.0 whose performance weights are the scores
    fn scored_agent(scores: &[f64]) -> (Agent, BeliefRegistry, Vec<BehaviourId>) {
        let mut behaviours = BehaviourRegistry::new();
        let ids: Vec<BehaviourId> = (0..scores.len())
            .map(|i| behaviours.register(format!("behaviour_{}", i)))
            .collect();

        let mut beliefs = BeliefRegistry::new();
        let belief: BeliefId = beliefs.register("driver");
        for (&id, &score) in ids.iter().zip(scores) {
            beliefs
                .get_mut(belief)
                .unwrap()
                .set_performance_relationship(id, score);
        }

        let mut agent = Agent::new(AgentId::new(0), "ada");
        for &id in &ids {
            agent.add_known_behaviour(id);
        }
        agent.set_activation(SimTime::ZERO, belief, 1.0).unwrap();

        (agent, beliefs, ids)
    }

    #[test]
    fn test_score_sums_over_beliefs() {
        let mut behaviours = BehaviourRegistry::new();
        let walk = behaviours.register("walk");

        let mut beliefs = BeliefRegistry::new();
        let a = beliefs.register("a");
        let b = beliefs.register("b");
        beliefs.get_mut(a).unwrap().set_performance_relationship(walk, 0.5);
        beliefs.get_mut(b).unwrap().set_performance_relationship(walk, -1.0);

        let mut agent = Agent::new(AgentId::new(0), "ada").with_known_behaviour(walk);
        agent.set_activation(SimTime::ZERO, a, 0.6).unwrap();
        agent.set_activation(SimTime::ZERO, b, 0.1).unwrap();

        let score = score_behaviour(&agent, &beliefs, walk, SimTime::ZERO);
        assert!((score - 0.2).abs() < 1e-12);

        // Nothing recorded at that step
        assert_eq!(score_behaviour(&agent, &beliefs, walk, SimTime::new(9)), 0.0);
    }

    #[test]
    fn test_scores_sorted_ascending_and_stable() {
        let (agent, beliefs, ids) = scored_agent(&[0.3, -0.1, 0.3, 0.0]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);

        let order: Vec<BehaviourId> = scored.iter().map(|s| s.item).collect();
        assert_eq!(order, vec![ids[1], ids[3], ids[0], ids[2]]);
    }

    #[test]
    fn test_all_negative_picks_highest() {
        let (agent, beliefs, ids) = scored_agent(&[-0.5, -0.2, -0.9]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);

        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_eq!(select_behaviour(&scored, &mut rng), Some(ids[1]));
        }
    }

    #[test]
    fn test_single_non_negative_is_deterministic() {
        let (agent, beliefs, ids) = scored_agent(&[-0.3, 0.4, -0.1]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);

        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_eq!(select_behaviour(&scored, &mut rng), Some(ids[1]));
        }
    }

    #[test]
    fn test_single_zero_score_is_chosen() {
        let (agent, beliefs, ids) = scored_agent(&[-0.3, 0.0]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(select_behaviour(&scored, &mut rng), Some(ids[1]));
    }

    #[test]
    fn test_multiple_zero_scores_choose_uniformly() {
        let (agent, beliefs, ids) = scored_agent(&[0.0, 0.0, -0.4]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);
        let mut rng = SmallRng::seed_from_u64(99);

        let mut first = 0;
        let trials = 4000;
        for _ in 0..trials {
            let chosen = select_behaviour(&scored, &mut rng).unwrap();
            assert_ne!(chosen, ids[2]);
            if chosen == ids[0] {
                first += 1;
            }
        }

        let share = first as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.05, "share was {}", share);
    }

    #[test]
    fn test_weighted_choice_frequencies() {
        let (agent, beliefs, ids) = scored_agent(&[0.3, 0.1]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);
        let mut rng = SmallRng::seed_from_u64(12345);

        let trials = 10_000;
        let mut high = 0;
        for _ in 0..trials {
            if select_behaviour(&scored, &mut rng) == Some(ids[0]) {
                high += 1;
            }
        }

        let share = high as f64 / trials as f64;
        assert!((share - 0.75).abs() < 0.03, "share was {}", share);
    }

    #[test]
    fn test_choose_action_records_choice() {
        let (mut agent, beliefs, ids) = scored_agent(&[-0.5, 0.4]);
        let mut rng = SmallRng::seed_from_u64(7);

        let chosen = choose_action(&mut agent, &beliefs, SimTime::ZERO, &mut rng).unwrap();
        assert_eq!(chosen, Some(ids[1]));
        assert_eq!(agent.action(SimTime::ZERO), Some(ids[1]));
    }

    #[test]
    fn test_choose_action_without_known_behaviours() {
        let beliefs = BeliefRegistry::new();
        let mut agent = Agent::new(AgentId::new(0), "ada");
        let mut rng = SmallRng::seed_from_u64(7);

        let chosen = choose_action(&mut agent, &beliefs, SimTime::ZERO, &mut rng).unwrap();
        assert_eq!(chosen, None);
        assert!(agent.actions().is_empty());
    }

    #[test]
    fn test_no_activations_scores_zero_for_all() {
        let mut behaviours = BehaviourRegistry::new();
        let walk = behaviours.register("walk");
        let drive = behaviours.register("drive");
        let beliefs = BeliefRegistry::new();
        let agent = Agent::new(AgentId::new(0), "ada")
            .with_known_behaviour(walk)
            .with_known_behaviour(drive);

        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);
        assert!(scored.iter().all(|s| s.weight == 0.0));
        assert_eq!(scored[0].item, walk);
    }

    #[test]
    fn test_nan_scores_sort_first_and_are_never_chosen() {
        let (agent, beliefs, ids) = scored_agent(&[f64::NAN, 0.3, f64::NAN, 0.1]);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);

        let order: Vec<BehaviourId> = scored.iter().map(|s| s.item).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3], ids[1]]);

        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let chosen = select_behaviour(&scored, &mut rng).unwrap();
            assert!(chosen == ids[1] || chosen == ids[3]);
        }
    }

    #[test]
    fn test_many_mixed_nan_scores_sort_without_panic() {
        let scores: Vec<f64> = (0..30)
            .map(|i| if i % 3 == 0 { f64::NAN } else { (i as f64 - 15.0) / 10.0 })
            .collect();
        let (agent, beliefs, _) = scored_agent(&scores);
        let scored = score_behaviours(&agent, &beliefs, SimTime::ZERO);

        let numbers: Vec<f64> = scored.iter().map(|s| s.weight).filter(|w| !w.is_nan()).collect();
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        assert!(scored[..10].iter().all(|s| s.weight.is_nan()));
    }
}
