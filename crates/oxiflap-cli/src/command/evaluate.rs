use std::path::PathBuf;

use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

use oxiflap_engine::WorldSeed;
use oxiflap_evaluator::{
    FitnessEvaluator, Network, NetworkSpec, Policy,
    fitness::DEFAULT_TICK_LIMIT,
    policy::{LinearPolicy, RandomPolicy},
};
use oxiflap_training::stats::FitnessStats;

use crate::model::NetworkModel;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum PolicyType {
    #[default]
    Neural,
    Linear,
    Random,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Controller to evaluate: neural, linear, or random
    #[arg(long, default_value = "neural")]
    policy: PolicyType,
    /// Trained model file (neural policy only)
    #[arg(long)]
    model: Option<PathBuf>,
    #[arg(long, default_value_t = 10)]
    trials: usize,
    /// Tick cap per trial
    #[arg(long, default_value_t = DEFAULT_TICK_LIMIT)]
    tick_limit: u64,
    /// Per-tick flap probability of the random baseline
    #[arg(long, default_value_t = RandomPolicy::DEFAULT_FLAP_PROBABILITY)]
    flap_probability: f64,
    /// RNG seed for reproducible trials
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.trials > 0, "at least one trial is required");
    anyhow::ensure!(
        (0.0..=1.0).contains(&arg.flap_probability),
        "flap probability must be within [0, 1], got {}",
        arg.flap_probability,
    );

    let mut rng = match arg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // A missing model file is expected (e.g. before the first training run)
    // and falls back to a fresh random network; a present but malformed file
    // is an error.
    let mut policy = match arg.policy {
        PolicyType::Neural => match &arg.model {
            Some(path) if path.exists() => {
                Policy::Neural(NetworkModel::open(path)?.to_network()?)
            }
            Some(path) => {
                eprintln!(
                    "Model file not found: {}; evaluating a randomly initialized network",
                    path.display()
                );
                Policy::Neural(Network::random(NetworkSpec::default(), &mut rng))
            }
            None => {
                eprintln!("No model file given; evaluating a randomly initialized network");
                Policy::Neural(Network::random(NetworkSpec::default(), &mut rng))
            }
        },
        PolicyType::Linear => Policy::Linear(LinearPolicy::default()),
        PolicyType::Random => Policy::Random(match arg.seed {
            Some(seed) => RandomPolicy::with_seed(arg.flap_probability, seed),
            None => RandomPolicy::new(arg.flap_probability),
        }),
    };

    let evaluator = FitnessEvaluator::new(arg.tick_limit);
    let seeds: Vec<WorldSeed> = (0..arg.trials).map(|_| rng.random()).collect();

    eprintln!("Running {} trials:", arg.trials);
    let mut scores = Vec::with_capacity(seeds.len());
    for (i, &seed) in seeds.iter().enumerate() {
        let result = evaluator.run_trial(&mut policy, seed);
        eprintln!(
            "  {i:2}: {:5} ticks, {:3} cleared => {:.1}",
            result.ticks,
            result.obstacles_cleared,
            result.score()
        );
        scores.push(result.score());
    }

    let stats = FitnessStats::new(scores).expect("at least one trial ran");
    eprintln!("Score Stats:");
    eprintln!("  Min:    {:.3}", stats.min);
    eprintln!("  Max:    {:.3}", stats.max);
    eprintln!("  Mean:   {:.3}", stats.mean);
    eprintln!("  Stddev: {:.3}", stats.std_dev);

    Ok(())
}
