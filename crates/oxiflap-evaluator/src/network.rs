//! Fixed-topology feed-forward network over a flat weight vector.
//!
//! The network maps a normalized [`Observation`] to a flap decision. Its
//! entire behavior is determined by a [`Genotype`]: a flat, ordered weight
//! vector split into four contiguous blocks:
//!
//! ```text
//! [ input→hidden matrix | hidden biases | hidden→output | output bias ]
//!   num_features × H      H               H               1
//! ```
//!
//! Evaluation is a pure function: the same genotype and observation always
//! produce the same output. Randomness exists only at construction time,
//! when a fresh genotype is drawn with Xavier-style initialization.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::observation::{NUM_FEATURES, Observation};

/// Architecture descriptor for a [`Network`].
///
/// Serialized alongside exported weights so that a weight file can be
/// validated before use: the flat array must have exactly
/// [`total_weights`](Self::total_weights) entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub num_features: usize,
    pub hidden_size: usize,
}

impl Default for NetworkSpec {
    fn default() -> Self {
        Self {
            num_features: NUM_FEATURES,
            hidden_size: 8,
        }
    }
}

impl NetworkSpec {
    /// Total number of weights a genotype for this architecture must carry:
    /// `num_features * hidden_size + hidden_size + hidden_size + 1`.
    #[must_use]
    pub fn total_weights(&self) -> usize {
        self.num_features * self.hidden_size + 2 * self.hidden_size + 1
    }
}

/// A genotype whose length does not match its architecture.
///
/// Wrong-length weight vectors are always rejected outright; they are never
/// padded or truncated.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("genotype has {actual} weights, expected {expected}")]
pub struct GenotypeLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// A flat, ordered vector of network weights.
///
/// Genotypes are immutable once created; crossover and mutation always
/// produce new genotypes rather than editing in place, which keeps genealogy
/// traceable in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genotype(Vec<f32>);

impl Genotype {
    /// Wraps a weight vector, validating its length against `spec`.
    pub fn new(spec: NetworkSpec, weights: Vec<f32>) -> Result<Self, GenotypeLengthError> {
        if weights.len() != spec.total_weights() {
            return Err(GenotypeLengthError {
                expected: spec.total_weights(),
                actual: weights.len(),
            });
        }
        Ok(Self(weights))
    }

    /// Draws a fresh genotype with Xavier-style uniform initialization:
    /// every weight is sampled from `±sqrt(6 / (num_features + hidden_size))`.
    #[expect(clippy::cast_precision_loss)]
    pub fn random<R>(spec: NetworkSpec, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let limit = (6.0 / (spec.num_features + spec.hidden_size) as f32).sqrt();
        let weights = (0..spec.total_weights())
            .map(|_| rng.random_range(-limit..=limit))
            .collect();
        Self(weights)
    }

    /// Returns the weights in block order.
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The outcome of one network evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// True when the raw output is strictly positive.
    pub flap: bool,
    /// Pre-threshold output value.
    pub raw_output: f32,
    /// Post-tanh activation of each hidden unit.
    pub hidden_activations: Vec<f32>,
}

/// Feed-forward evaluator binding a [`Genotype`] to a [`NetworkSpec`].
#[derive(Debug, Clone)]
pub struct Network {
    spec: NetworkSpec,
    genotype: Genotype,
}

impl Network {
    /// Builds a network, validating the genotype length against the spec.
    pub fn new(spec: NetworkSpec, genotype: Genotype) -> Result<Self, GenotypeLengthError> {
        if genotype.len() != spec.total_weights() {
            return Err(GenotypeLengthError {
                expected: spec.total_weights(),
                actual: genotype.len(),
            });
        }
        Ok(Self { spec, genotype })
    }

    /// Builds a network with a freshly initialized random genotype.
    pub fn random<R>(spec: NetworkSpec, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            spec,
            genotype: Genotype::random(spec, rng),
        }
    }

    #[must_use]
    pub fn spec(&self) -> NetworkSpec {
        self.spec
    }

    #[must_use]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    /// Evaluates the network on one observation.
    ///
    /// Hidden activation is `tanh(bias + Σ input·weight)` per unit; the
    /// output is a plain weighted sum plus bias, and the flap decision is
    /// `output > 0`. Deterministic: no internal randomness and no retained
    /// state between calls.
    #[must_use]
    pub fn decide(&self, observation: &Observation) -> Decision {
        let hidden_size = self.spec.hidden_size;
        let inputs = &observation.features()[..self.spec.num_features];

        let (input_weights, rest) = self
            .genotype
            .weights()
            .split_at(self.spec.num_features * hidden_size);
        let (hidden_biases, rest) = rest.split_at(hidden_size);
        let (output_weights, output_bias) = rest.split_at(hidden_size);

        let hidden_activations: Vec<f32> = (0..hidden_size)
            .map(|unit| {
                let sum = inputs
                    .iter()
                    .enumerate()
                    .map(|(feature, &input)| input * input_weights[feature * hidden_size + unit])
                    .sum::<f32>();
                (hidden_biases[unit] + sum).tanh()
            })
            .collect();

        let raw_output = output_bias[0]
            + hidden_activations
                .iter()
                .zip(output_weights)
                .map(|(activation, weight)| activation * weight)
                .sum::<f32>();

        Decision {
            flap: raw_output > 0.0,
            raw_output,
            hidden_activations,
        }
    }
}

#[cfg(test)]
mod tests {
    use oxiflap_engine::{WorldSnapshot, WorldStatus};
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    fn observation(gap_offset: f32, horizontal_distance: f32, bird_y: f32) -> Observation {
        let snapshot = WorldSnapshot {
            bird_y,
            bird_velocity: 0.0,
            gap_offset,
            horizontal_distance,
            ticks: 0,
            score: 0,
            status: WorldStatus::Running,
        };
        Observation::from_snapshot(&snapshot, None)
    }

    #[test]
    fn spec_counts_all_weight_blocks() {
        let spec = NetworkSpec::default();
        assert_eq!(spec.total_weights(), 6 * 8 + 8 + 8 + 1);
    }

    #[test]
    fn wrong_length_genotype_is_rejected() {
        let spec = NetworkSpec::default();
        let err = Genotype::new(spec, vec![0.0; 10]).unwrap_err();
        assert_eq!(err.expected, spec.total_weights());
        assert_eq!(err.actual, 10);
    }

    #[test]
    fn xavier_initialization_respects_bounds() {
        let spec = NetworkSpec::default();
        let mut rng = StdRng::seed_from_u64(1);
        let limit = (6.0f32 / (6 + 8) as f32).sqrt();
        for _ in 0..10 {
            let genotype = Genotype::random(spec, &mut rng);
            assert_eq!(genotype.len(), spec.total_weights());
            assert!(genotype.weights().iter().all(|w| w.abs() <= limit));
        }
    }

    #[test]
    fn all_zero_genotype_falls() {
        // Centered on the gap with the obstacle far away, zero weights give a
        // raw output of exactly zero, which is not a flap.
        let spec = NetworkSpec::default();
        let genotype = Genotype::new(spec, vec![0.0; spec.total_weights()]).unwrap();
        let network = Network::new(spec, genotype).unwrap();
        let decision = network.decide(&observation(0.0, 200.0, 256.0));
        assert_eq!(decision.raw_output, 0.0);
        assert!(!decision.flap);
    }

    #[test]
    fn decide_is_deterministic() {
        let spec = NetworkSpec::default();
        let mut rng = StdRng::seed_from_u64(2);
        let network = Network::random(spec, &mut rng);
        let obs = observation(-120.0, 80.0, 300.0);
        let first = network.decide(&obs);
        for _ in 0..5 {
            assert_eq!(network.decide(&obs), first);
        }
    }

    #[test]
    fn single_hidden_unit_matches_hand_computation() {
        // One hidden unit wired only to the gap-offset feature:
        // output = tanh(1.0 * gap_feature).
        let spec = NetworkSpec {
            num_features: NUM_FEATURES,
            hidden_size: 1,
        };
        let mut weights = vec![0.0; spec.total_weights()];
        weights[0] = 1.0; // input→hidden for feature 0
        weights[NUM_FEATURES + 1] = 1.0; // hidden→output
        let network = Network::new(spec, Genotype::new(spec, weights).unwrap()).unwrap();

        let decision = network.decide(&observation(128.0, 200.0, 256.0));
        let expected = (128.0f32 / 256.0).tanh();
        assert!((decision.raw_output - expected).abs() < 1e-6);
        assert_eq!(decision.hidden_activations.len(), 1);
        assert!(decision.flap);
    }

    #[test]
    fn hidden_bias_block_feeds_every_unit() {
        // Zero inputs, saturating positive hidden biases, unit output
        // weights: output = hidden_size * tanh(bias).
        let spec = NetworkSpec::default();
        let mut weights = vec![0.0; spec.total_weights()];
        let bias_block = spec.num_features * spec.hidden_size;
        for unit in 0..spec.hidden_size {
            weights[bias_block + unit] = 10.0;
            weights[bias_block + spec.hidden_size + unit] = 1.0;
        }
        let network = Network::new(spec, Genotype::new(spec, weights).unwrap()).unwrap();

        let decision = network.decide(&observation(0.0, 0.0, 0.0));
        let expected = 8.0 * 10.0f32.tanh();
        assert!((decision.raw_output - expected).abs() < 1e-4);
        assert!(decision.flap);
    }

    #[test]
    fn genotype_serializes_as_flat_array() {
        let spec = NetworkSpec {
            num_features: 1,
            hidden_size: 1,
        };
        let genotype = Genotype::new(spec, vec![0.5, -1.0, 2.0, 0.0]).unwrap();
        let json = serde_json::to_string(&genotype).unwrap();
        assert_eq!(json, "[0.5,-1.0,2.0,0.0]");
        let back: Genotype = serde_json::from_str(&json).unwrap();
        assert_eq!(back, genotype);
    }
}
