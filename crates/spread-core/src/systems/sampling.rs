//! Ordered Weighted Sampling
//!
//! The single primitive behind stochastic action selection: normalize a list
//! of non-negative weights and walk it in the given order with one uniform
//! draw. The traversal order is part of the contract; two lists with the same
//! distribution in a different order can pick differently for the same draw.

/// An item paired with its (unnormalized or normalized) weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weighted<T> {
    pub item: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub fn new(item: T, weight: f64) -> Self {
        Self { item, weight }
    }
}

/// Divide every weight by the total, preserving order
///
/// When the total is zero every item gets `1 / n`, i.e. a uniform choice.
pub fn normalize<T: Copy>(weights: &[Weighted<T>]) -> Vec<Weighted<T>> {
    let total: f64 = weights.iter().map(|w| w.weight).sum();

    if total == 0.0 {
        tracing::trace!(candidates = weights.len(), "zero normalizer, sampling uniformly");
        let uniform = 1.0 / weights.len() as f64;
        return weights
            .iter()
            .map(|w| Weighted::new(w.item, uniform))
            .collect();
    }

    weights
        .iter()
        .map(|w| Weighted::new(w.item, w.weight / total))
        .collect()
}

/// Walk a probability list in order, subtracting each probability from
/// `draw`; the first item at which the remainder drops to zero or below is
/// chosen, and the last item when the walk is exhausted.
///
/// Returns `None` only for an empty list.
pub fn walk<T: Copy>(probabilities: &[Weighted<T>], draw: f64) -> Option<T> {
    let fallback = probabilities.last()?.item;

    let mut remaining = draw;
    for p in probabilities {
        remaining -= p.weight;
        if remaining <= 0.0 {
            return Some(p.item);
        }
    }

    Some(fallback)
}
