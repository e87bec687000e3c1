//! Controllers and fitness evaluation for the obstacle-course agent.
//!
//! This crate implements everything between the simulation engine and the
//! training system:
//!
//! 1. **Observation** ([`observation`]) - turns a raw world snapshot into the
//!    fixed normalized feature vector the controllers consume
//! 2. **Network** ([`network`]) - fixed-topology feed-forward evaluator over a
//!    flat weight vector (the genotype)
//! 3. **Policies** ([`policy`]) - the closed set of control strategies
//!    (neural network, linear heuristic, random baseline)
//! 4. **Fitness** ([`fitness`]) - runs policies through complete trials and
//!    aggregates trial scores into a scalar fitness
//!
//! # Data Flow
//!
//! ```text
//! World snapshot
//!     ↓ normalized by
//! Observation (6 features)
//!     ↓ consumed by
//! Policy (Network / Linear / Random)
//!     ↓ flap decision drives
//! World::step
//!     ↓ repeated until termination
//! TrialResult → fitness score
//! ```
//!
//! The per-tick previous-position state needed for velocity derivation is
//! owned by the trial runner and threaded through explicitly; neither the
//! network nor the observation code keeps hidden mutable state.

pub mod fitness;
pub mod network;
pub mod observation;
pub mod policy;

pub use self::{
    fitness::{FitnessEvaluator, TrialResult},
    network::{Genotype, GenotypeLengthError, Network, NetworkSpec},
    observation::{NUM_FEATURES, Observation},
    policy::Policy,
};
