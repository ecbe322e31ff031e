//! Simulation Time
//!
//! Discrete, explicitly threaded time steps. There is no global clock in the
//! engines; every operation receives the step it works on.
//!
//! # Example
//!
//! ```
//! use spread_events::SimTime;
//!
//! let t = SimTime::new(3);
//! assert_eq!(t.next(), SimTime::new(4));
//! assert_eq!(t.prev(), Some(SimTime::new(2)));
//! assert_eq!(SimTime::ZERO.prev(), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete simulation time step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    /// The first time step, at which initial activations are recorded.
    pub const ZERO: SimTime = SimTime(0);

    pub const fn new(step: u64) -> Self {
        Self(step)
    }

    /// Returns the raw step number.
    pub const fn step(self) -> u64 {
        self.0
    }

    /// Returns the following step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the preceding step, or `None` at time zero.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl From<u64> for SimTime {
    fn from(step: u64) -> Self {
        Self(step)
    }
}
