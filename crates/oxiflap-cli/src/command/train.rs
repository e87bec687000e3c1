use std::path::PathBuf;

use anyhow::Context as _;
use rand::{SeedableRng as _, rngs::StdRng};

use oxiflap_evaluator::{FitnessEvaluator, NetworkSpec, fitness::DEFAULT_TICK_LIMIT};
use oxiflap_training::genetic::{CrossoverKind, Trainer, TrainingConfig};

use crate::{model::NetworkModel, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Individuals per generation
    #[arg(long, default_value_t = 50)]
    population_size: usize,
    /// Top individuals carried over unchanged each generation
    #[arg(long, default_value_t = 5)]
    elite_count: usize,
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Trials per fitness evaluation
    #[arg(long, default_value_t = 3)]
    trials: usize,
    #[arg(long, default_value_t = 0.1)]
    mutation_sigma: f32,
    /// Symmetric bound on mutated weights
    #[arg(long, default_value_t = 3.0)]
    weight_clip: f32,
    /// Crossover operator: blend, uniform, or singlepoint
    #[arg(long, default_value = "blend")]
    crossover: CrossoverKind,
    #[arg(long, default_value_t = 3)]
    tournament_size: usize,
    /// Tick cap per trial
    #[arg(long, default_value_t = DEFAULT_TICK_LIMIT)]
    tick_limit: u64,
    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Model name recorded in the output file
    #[arg(long, default_value = "flapper")]
    name: String,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = TrainingConfig {
        population_size: arg.population_size,
        elite_count: arg.elite_count,
        generations: arg.generations,
        trials_per_evaluation: arg.trials,
        mutation_sigma: arg.mutation_sigma,
        weight_clip: arg.weight_clip,
        crossover: arg.crossover,
        tournament_size: arg.tournament_size,
    };
    let spec = NetworkSpec::default();
    let evaluator = FitnessEvaluator::new(arg.tick_limit);

    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut trainer = Trainer::new(spec, config, evaluator, &mut rng)?;

    for generation in 0..config.generations {
        trainer.evaluate_generation(&mut rng);

        let stats = trainer.population().fitness_stats();
        eprintln!("Generation #{generation}:");
        eprintln!("  Fitness Stats:");
        eprintln!("    Min:    {:.3}", stats.min);
        eprintln!("    Max:    {:.3}", stats.max);
        eprintln!("    Mean:   {:.3}", stats.mean);
        eprintln!("    Stddev: {:.3}", stats.std_dev);

        if generation + 1 < config.generations {
            trainer.advance_generation(&mut rng);
        }
    }

    eprintln!("Training completed.");

    let best = trainer
        .best_ever()
        .context("no generations were run, nothing to save")?;
    let model = NetworkModel::from_trained(&arg.name, spec, best);
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Fitness: {:.3}", model.fitness);
    eprintln!("  Weights: {}", model.weights.len());

    Ok(())
}
