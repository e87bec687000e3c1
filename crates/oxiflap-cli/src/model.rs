use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oxiflap_evaluator::{Genotype, NUM_FEATURES, Network, NetworkSpec};
use oxiflap_training::genetic::Individual;

use crate::util;

/// Architecture block serialized alongside the weights so a model file can
/// be validated before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Architecture {
    pub num_features: usize,
    pub hidden_size: usize,
    pub total_weights: usize,
}

impl From<NetworkSpec> for Architecture {
    fn from(spec: NetworkSpec) -> Self {
        Self {
            num_features: spec.num_features,
            hidden_size: spec.hidden_size,
            total_weights: spec.total_weights(),
        }
    }
}

/// A trained controller as persisted to disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub fitness: f32,
    pub weights: Vec<f32>,
    pub architecture: Architecture,
}

impl NetworkModel {
    pub fn from_trained(name: &str, spec: NetworkSpec, individual: &Individual) -> Self {
        Self {
            name: name.to_owned(),
            trained_at: Utc::now(),
            fitness: individual.fitness(),
            weights: individual.genotype().weights().to_vec(),
            architecture: spec.into(),
        }
    }

    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("model", path)
    }

    /// Rebuilds the network this model describes.
    ///
    /// The architecture block must name the fixed observation layout and be
    /// internally consistent, and the weight array must match it exactly;
    /// truncated or padded files are rejected.
    pub fn to_network(&self) -> anyhow::Result<Network> {
        anyhow::ensure!(
            self.architecture.num_features == NUM_FEATURES,
            "model expects {} input features, observations carry {}",
            self.architecture.num_features,
            NUM_FEATURES,
        );
        let spec = NetworkSpec {
            num_features: self.architecture.num_features,
            hidden_size: self.architecture.hidden_size,
        };
        anyhow::ensure!(
            self.architecture.total_weights == spec.total_weights(),
            "model architecture is inconsistent: {} features x {} hidden requires {} weights, file says {}",
            self.architecture.num_features,
            self.architecture.hidden_size,
            spec.total_weights(),
            self.architecture.total_weights,
        );
        let genotype = Genotype::new(spec, self.weights.clone())?;
        Ok(Network::new(spec, genotype)?)
    }
}
