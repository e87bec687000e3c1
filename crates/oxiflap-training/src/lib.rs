//! Training system: evolving network genotypes with a genetic algorithm.
//!
//! This crate optimizes the flat weight vectors consumed by
//! `oxiflap_evaluator::Network`. It knows nothing about what the weights
//! mean; fitness comes entirely from playing simulation trials through the
//! evaluator crate.
//!
//! # How Training Works
//!
//! 1. **Population** - Create a population of Xavier-initialized genotypes
//! 2. **Evaluation** - Each genotype plays several trials; scores aggregate
//!    into one fitness value (trials run in parallel across the population)
//! 3. **Selection** - Elites carry over unchanged; tournament selection
//!    picks parents for the remaining slots
//! 4. **Reproduction** - Crossover combines two parents; Gaussian mutation
//!    perturbs every offspring weight, clipped to a symmetric bound
//! 5. **Repeat** - For a configured number of generations, tracking the best
//!    genotype ever seen (fitness is noisy, so the last generation's best is
//!    not necessarily the all-time best)
//!
//! # Crossover Operators
//!
//! Three operators are available, selected by [`CrossoverKind`](genetic::CrossoverKind):
//!
//! - **Blend** (default) - per-weight interpolation biased toward the fitter
//!   parent, so stronger genetic material propagates more often
//! - **Uniform** - each weight copied from a random parent
//! - **SinglePoint** - one cut point, prefix from one parent, suffix from the
//!   other
//!
//! # Configuration
//!
//! All training knobs live in [`genetic::TrainingConfig`] and are validated
//! before the first generation runs; an elite count that meets or exceeds
//! the population size is a configuration error, not a runtime surprise.

pub mod genetic;
pub mod genotype;
pub mod stats;
