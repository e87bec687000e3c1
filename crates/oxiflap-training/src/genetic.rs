//! Genetic algorithm over populations of network genotypes.
//!
//! Each generation runs the cycle Evaluate → Select → Breed → Mutate →
//! Replace:
//!
//! 1. **Evaluate** - every individual plays the same set of seeded trials and
//!    receives an aggregated fitness score; individuals evaluate in parallel
//!    since trials share no mutable state
//! 2. **Select** - the top `elite_count` individuals pass into the next
//!    generation unchanged; parents for the remaining slots come from
//!    tournament selection
//! 3. **Breed** - a crossover operator combines the two parents' genotypes
//! 4. **Mutate** - Gaussian noise perturbs every offspring weight, clipped to
//!    a symmetric bound
//! 5. **Replace** - the new population replaces the old wholesale; all prior
//!    fitness values are stale from this point on
//!
//! [`Trainer`] drives the loop for a configured number of generations and
//! remembers the best individual ever evaluated: fitness is noisy (gap
//! placement is random), so the best of the final generation is not
//! necessarily the best overall.

use std::thread;

use rand::{Rng, seq::IndexedRandom};

use oxiflap_engine::WorldSeed;
use oxiflap_evaluator::{FitnessEvaluator, Genotype, Network, NetworkSpec, Policy};

use crate::{genotype, stats::FitnessStats};

/// Crossover operator selection.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum CrossoverKind {
    /// Fitness-weighted interpolation of the parents (default).
    #[default]
    Blend,
    /// Each weight copied from a randomly chosen parent.
    Uniform,
    /// Prefix from one parent, suffix from the other.
    SinglePoint,
}

/// Invalid training configuration, rejected before any generation runs.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("elite count {elite_count} must be smaller than population size {population_size}")]
    EliteCountTooLarge {
        elite_count: usize,
        population_size: usize,
    },
    #[display("tournament size must be at least 1")]
    EmptyTournament,
    #[display("trials per evaluation must be at least 1")]
    NoTrials,
    #[display("mutation sigma must be a non-negative finite number, got {mutation_sigma}")]
    InvalidMutationSigma { mutation_sigma: f32 },
    #[display("weight clip must be a positive finite number, got {weight_clip}")]
    InvalidWeightClip { weight_clip: f32 },
}

/// The full training configuration surface.
#[derive(Debug, Clone, Copy)]
pub struct TrainingConfig {
    pub population_size: usize,
    pub elite_count: usize,
    pub generations: usize,
    pub trials_per_evaluation: usize,
    pub mutation_sigma: f32,
    pub weight_clip: f32,
    pub crossover: CrossoverKind,
    pub tournament_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            elite_count: 5,
            generations: 50,
            trials_per_evaluation: 3,
            mutation_sigma: 0.1,
            weight_clip: 3.0,
            crossover: CrossoverKind::default(),
            tournament_size: 3,
        }
    }
}

impl TrainingConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elite_count >= self.population_size {
            return Err(ConfigError::EliteCountTooLarge {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if self.trials_per_evaluation == 0 {
            return Err(ConfigError::NoTrials);
        }
        if self.mutation_sigma < 0.0 || !self.mutation_sigma.is_finite() {
            return Err(ConfigError::InvalidMutationSigma {
                mutation_sigma: self.mutation_sigma,
            });
        }
        if self.weight_clip <= 0.0 || !self.weight_clip.is_finite() {
            return Err(ConfigError::InvalidWeightClip {
                weight_clip: self.weight_clip,
            });
        }
        Ok(())
    }
}

/// A single candidate solution: one genotype and its latest fitness score.
#[derive(Debug, Clone)]
pub struct Individual {
    genotype: Genotype,
    fitness: f32,
}

impl Individual {
    /// Creates an individual with a freshly initialized genotype.
    pub fn random<R>(spec: NetworkSpec, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            genotype: Genotype::random(spec, rng),
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    /// Returns the fitness from the most recent evaluation.
    ///
    /// Only meaningful for the generation in which it was computed; breeding
    /// discards it.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// A generation's worth of individuals, evaluated together.
#[derive(Debug, Clone)]
pub struct Population {
    spec: NetworkSpec,
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population of random individuals.
    pub fn random<R>(spec: NetworkSpec, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(spec, rng))
            .collect();
        Self { spec, individuals }
    }

    #[must_use]
    pub fn spec(&self) -> NetworkSpec {
        self.spec
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Evaluates fitness for all individuals in parallel, then sorts the
    /// population by fitness descending (best first).
    ///
    /// Every individual plays the same seeded trials, so scores differ only
    /// by genotype, not by luck of gap placement.
    pub fn evaluate_fitness(&mut self, evaluator: &FitnessEvaluator, seeds: &[WorldSeed]) {
        let spec = self.spec;
        thread::scope(|s| {
            for ind in &mut self.individuals {
                let network = Network::new(spec, ind.genotype.clone())
                    .expect("population genotypes always match the architecture");
                s.spawn(move || {
                    let mut policy = Policy::Neural(network);
                    ind.fitness = evaluator.evaluate_seeded(&mut policy, seeds);
                });
            }
        });

        // sort by fitness descending
        self.individuals
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
    }

    /// Returns fitness statistics for the latest evaluation.
    #[must_use]
    pub fn fitness_stats(&self) -> FitnessStats {
        FitnessStats::new(self.individuals.iter().map(|ind| ind.fitness))
            .expect("population is never empty")
    }
}

/// Breeds the next generation from an evaluated population.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    pub elite_count: usize,
    pub tournament_size: usize,
    pub mutation_sigma: f32,
    pub weight_clip: f32,
    pub crossover: CrossoverKind,
}

impl PopulationEvolver {
    #[must_use]
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            elite_count: config.elite_count,
            tournament_size: config.tournament_size,
            mutation_sigma: config.mutation_sigma,
            weight_clip: config.weight_clip,
            crossover: config.crossover,
        }
    }

    /// Evolves the population into the next generation.
    ///
    /// The top `elite_count` individuals are carried over as exact copies
    /// (never re-mutated); every other slot is filled by tournament-selected
    /// parents, crossover, and mutation.
    ///
    /// # Panics
    ///
    /// Panics if the population is not sorted by fitness descending.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(
            population
                .individuals
                .is_sorted_by(|a, b| a.fitness >= b.fitness)
        );

        let mut next_individuals = Vec::with_capacity(population.individuals.len());
        next_individuals.extend(population.individuals[..self.elite_count].iter().cloned());

        while next_individuals.len() < population.individuals.len() {
            let p1 = tournament_select(&population.individuals, self.tournament_size, rng);
            let p2 = tournament_select(&population.individuals, self.tournament_size, rng);

            let mut child = match self.crossover {
                CrossoverKind::Blend => genotype::blend(
                    p1.genotype.weights(),
                    p1.fitness,
                    p2.genotype.weights(),
                    p2.fitness,
                ),
                CrossoverKind::Uniform => {
                    genotype::uniform(p1.genotype.weights(), p2.genotype.weights(), rng)
                }
                CrossoverKind::SinglePoint => {
                    genotype::single_point(p1.genotype.weights(), p2.genotype.weights(), rng)
                }
            };
            genotype::mutate(&mut child, self.mutation_sigma, self.weight_clip, rng);

            next_individuals.push(Individual {
                genotype: Genotype::new(population.spec, child)
                    .expect("crossover preserves genotype length"),
                fitness: 0.0,
            });
        }

        Population {
            spec: population.spec,
            individuals: next_individuals,
        }
    }
}

/// Selects a parent by tournament: sample `tournament_size` individuals at
/// random and take the fittest of the sample.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap())
        .unwrap()
}

/// Drives the generation loop and tracks the best individual ever evaluated.
#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    evaluator: FitnessEvaluator,
    evolver: PopulationEvolver,
    population: Population,
    best_ever: Option<Individual>,
}

impl Trainer {
    /// Creates a trainer with a fresh random population.
    ///
    /// The configuration is validated here, before anything runs.
    pub fn new<R>(
        spec: NetworkSpec,
        config: TrainingConfig,
        evaluator: FitnessEvaluator,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let population = Population::random(spec, config.population_size, rng);
        Ok(Self {
            config,
            evaluator,
            evolver: PopulationEvolver::from_config(&config),
            population,
            best_ever: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Returns the best individual seen across all evaluated generations.
    #[must_use]
    pub fn best_ever(&self) -> Option<&Individual> {
        self.best_ever.as_ref()
    }

    /// Evaluates the current generation on a fresh set of shared trial seeds
    /// and updates the best-ever individual.
    pub fn evaluate_generation<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let seeds: Vec<WorldSeed> = (0..self.config.trials_per_evaluation)
            .map(|_| rng.random())
            .collect();
        self.population.evaluate_fitness(&self.evaluator, &seeds);

        let generation_best = &self.population.individuals()[0];
        if self
            .best_ever
            .as_ref()
            .is_none_or(|best| generation_best.fitness() > best.fitness())
        {
            self.best_ever = Some(generation_best.clone());
        }
    }

    /// Replaces the population with the next bred generation.
    pub fn advance_generation<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.population = self.evolver.evolve(&self.population, rng);
    }
}

#[cfg(test)]
mod tests {
    use oxiflap_evaluator::{NUM_FEATURES, Observation};
    use oxiflap_engine::{WorldSnapshot, WorldStatus};
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    fn spec() -> NetworkSpec {
        NetworkSpec::default()
    }

    /// Builds an evaluated (sorted) population with fixed fitness values.
    fn evaluated_population(fitness_values: &[f32], rng: &mut StdRng) -> Population {
        let mut individuals: Vec<Individual> = fitness_values
            .iter()
            .map(|&fitness| {
                let mut ind = Individual::random(spec(), rng);
                ind.fitness = fitness;
                ind
            })
            .collect();
        individuals.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
        Population {
            spec: spec(),
            individuals,
        }
    }

    mod config {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(TrainingConfig::default().validate().is_ok());
        }

        #[test]
        fn elite_count_must_be_smaller_than_population() {
            let config = TrainingConfig {
                population_size: 5,
                elite_count: 5,
                ..TrainingConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::EliteCountTooLarge { .. })
            ));
        }

        #[test]
        fn empty_population_is_rejected() {
            let config = TrainingConfig {
                population_size: 0,
                elite_count: 0,
                ..TrainingConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::EmptyPopulation)
            ));
        }

        #[test]
        fn negative_mutation_sigma_is_rejected() {
            let config = TrainingConfig {
                mutation_sigma: -0.1,
                ..TrainingConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMutationSigma { .. })
            ));
        }

        #[test]
        fn non_positive_weight_clip_is_rejected() {
            // A clip bound that is zero or negative would make the mutation
            // clamp's lower bound exceed its upper bound mid-generation, so
            // it must fail before any generation runs.
            for weight_clip in [0.0, -1.0, f32::NAN] {
                let config = TrainingConfig {
                    weight_clip,
                    ..TrainingConfig::default()
                };
                assert!(matches!(
                    config.validate(),
                    Err(ConfigError::InvalidWeightClip { .. })
                ));
            }
        }

        #[test]
        fn crossover_kind_parses_from_str() {
            assert_eq!("blend".parse::<CrossoverKind>().unwrap(), CrossoverKind::Blend);
            assert_eq!(
                "uniform".parse::<CrossoverKind>().unwrap(),
                CrossoverKind::Uniform
            );
        }
    }

    mod evolution {
        use super::*;

        #[test]
        fn elites_pass_through_byte_identical() {
            let mut rng = StdRng::seed_from_u64(1);
            let population = evaluated_population(&[50.0, 40.0, 30.0, 20.0, 10.0, 5.0], &mut rng);
            let evolver = PopulationEvolver {
                elite_count: 2,
                tournament_size: 3,
                mutation_sigma: 0.5,
                weight_clip: 3.0,
                crossover: CrossoverKind::Blend,
            };

            let next = evolver.evolve(&population, &mut rng);
            for (elite, carried) in population
                .individuals()
                .iter()
                .take(2)
                .zip(next.individuals())
            {
                assert_eq!(elite.genotype(), carried.genotype());
            }
        }

        #[test]
        fn population_size_and_genotype_lengths_are_invariant() {
            let mut rng = StdRng::seed_from_u64(2);
            let mut population = evaluated_population(&[9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0], &mut rng);
            let evolver = PopulationEvolver {
                elite_count: 1,
                tournament_size: 2,
                mutation_sigma: 0.2,
                weight_clip: 3.0,
                crossover: CrossoverKind::Uniform,
            };

            for _ in 0..3 {
                population = evolver.evolve(&population, &mut rng);
                assert_eq!(population.individuals().len(), 7);
                for ind in population.individuals() {
                    assert_eq!(ind.genotype().len(), spec().total_weights());
                }
                // Mark the bred population as "evaluated" so the next round
                // can evolve it again.
                for ind in &mut population.individuals {
                    ind.fitness = 1.0;
                }
            }
        }

        #[test]
        fn offspring_weights_stay_within_the_clip_bound() {
            let mut rng = StdRng::seed_from_u64(3);
            let population = evaluated_population(&[4.0, 3.0, 2.0, 1.0], &mut rng);
            let evolver = PopulationEvolver {
                elite_count: 1,
                tournament_size: 2,
                mutation_sigma: 50.0,
                weight_clip: 3.0,
                crossover: CrossoverKind::Blend,
            };

            let next = evolver.evolve(&population, &mut rng);
            for ind in next.individuals().iter().skip(1) {
                assert!(ind.genotype().weights().iter().all(|w| w.abs() <= 3.0));
            }
        }
    }

    mod trainer {
        use super::*;

        #[test]
        fn invalid_config_is_rejected_before_training() {
            let mut rng = StdRng::seed_from_u64(4);
            let config = TrainingConfig {
                population_size: 4,
                elite_count: 9,
                ..TrainingConfig::default()
            };
            let result = Trainer::new(spec(), config, FitnessEvaluator::new(100), &mut rng);
            assert!(result.is_err());
        }

        #[test]
        fn tracks_best_ever_across_generations() {
            let mut rng = StdRng::seed_from_u64(5);
            let config = TrainingConfig {
                population_size: 6,
                elite_count: 1,
                generations: 2,
                trials_per_evaluation: 1,
                tournament_size: 2,
                ..TrainingConfig::default()
            };
            let mut trainer =
                Trainer::new(spec(), config, FitnessEvaluator::new(200), &mut rng).unwrap();
            assert!(trainer.best_ever().is_none());

            for _ in 0..config.generations {
                trainer.evaluate_generation(&mut rng);
                let generation_best = trainer.population().individuals()[0].fitness();
                let best_ever = trainer.best_ever().unwrap().fitness();
                assert!(best_ever >= generation_best);
                trainer.advance_generation(&mut rng);
                assert_eq!(trainer.population().individuals().len(), 6);
            }
        }
    }

    mod decision_bias {
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
        fn mutated_upward_correctors_still_favor_flapping() {
            // A single-hidden-unit genotype wired to flap hard when the bird
            // is below the gap. Gaussian-mutated variants should still pick
            // JUMP far more often than FALL in that situation.
            let spec = NetworkSpec {
                num_features: NUM_FEATURES,
                hidden_size: 1,
            };
            let mut base = vec![0.0f32; spec.total_weights()];
            base[0] = -5.0; // gap-offset input weight
            base[NUM_FEATURES + 1] = 1.0; // hidden→output weight

            // Obstacle close, bird far below the gap.
            let obs = observation(-200.0, 60.0, 400.0);

            let mut rng = StdRng::seed_from_u64(6);
            let mut flaps = 0;
            let variants = 200;
            for _ in 0..variants {
                let mut weights = base.clone();
                genotype::mutate(&mut weights, 0.1, 3.0, &mut rng);
                let network =
                    Network::new(spec, Genotype::new(spec, weights).unwrap()).unwrap();
                if network.decide(&obs).flap {
                    flaps += 1;
                }
            }
            assert!(flaps > variants / 2, "only {flaps}/{variants} variants flapped");
        }
    }
}
