//! Control policies: the closed set of decision strategies.
//!
//! Three strategies can drive the bird, selected by configuration rather
//! than open-ended subclassing:
//!
//! - [`Policy::Neural`] - the evolved feed-forward network (the strategy
//!   training optimizes)
//! - [`Policy::Linear`] - a fixed linear combination of the observation
//!   features, useful as a hand-tunable heuristic baseline
//! - [`Policy::Random`] - flaps with a fixed probability per tick, the floor
//!   any learned controller must beat
//!
//! All strategies consume the same [`Observation`], so baselines and the
//! evolved network are directly comparable trial for trial.

use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

use crate::{
    network::Network,
    observation::{NUM_FEATURES, Observation},
};

/// A control strategy for one trial.
#[derive(Debug, Clone)]
pub enum Policy {
    Neural(Network),
    Linear(LinearPolicy),
    Random(RandomPolicy),
}

impl Policy {
    /// Decides whether to flap this tick.
    ///
    /// Takes `&mut self` because the random baseline advances its RNG; the
    /// neural and linear strategies are pure.
    pub fn decide(&mut self, observation: &Observation) -> bool {
        match self {
            Policy::Neural(network) => network.decide(observation).flap,
            Policy::Linear(linear) => linear.decide(observation),
            Policy::Random(random) => random.decide(),
        }
    }
}

/// Linear heuristic: flap when a weighted sum of the features is positive.
#[derive(Debug, Clone)]
pub struct LinearPolicy {
    weights: [f32; NUM_FEATURES],
    bias: f32,
}

impl Default for LinearPolicy {
    /// Flap whenever the bird has sunk below the gap center.
    ///
    /// The gap-offset feature is negative below the gap, so a single negative
    /// weight on it produces upward correction.
    fn default() -> Self {
        Self {
            weights: [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            bias: 0.0,
        }
    }
}

impl LinearPolicy {
    #[must_use]
    pub fn new(weights: [f32; NUM_FEATURES], bias: f32) -> Self {
        Self { weights, bias }
    }

    #[must_use]
    pub fn decide(&self, observation: &Observation) -> bool {
        let sum = self
            .weights
            .iter()
            .zip(observation.features())
            .map(|(weight, feature)| weight * feature)
            .sum::<f32>();
        sum + self.bias > 0.0
    }
}

/// Random baseline: flaps with a fixed per-tick probability.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
    flap_probability: f64,
}

impl RandomPolicy {
    /// Per-tick flap probability roughly matching a hovering cadence.
    pub const DEFAULT_FLAP_PROBABILITY: f64 = 0.1;

    #[must_use]
    pub fn new(flap_probability: f64) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            flap_probability,
        }
    }

    /// Like [`Self::new`], but seeded for reproducible baseline runs.
    #[must_use]
    pub fn with_seed(flap_probability: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            flap_probability,
        }
    }

    pub fn decide(&mut self) -> bool {
        self.rng.random_bool(self.flap_probability)
    }
}
