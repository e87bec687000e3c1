//! Weight-vector operators for the genetic algorithm.
//!
//! These free functions implement the reproduction steps used by
//! [`genetic::PopulationEvolver`](crate::genetic::PopulationEvolver):
//! crossover between two parent genotypes and Gaussian mutation with
//! symmetric clipping. All operators build new weight vectors; parents are
//! never modified.
//!
//! Initialization lives with the network itself
//! ([`Genotype::random`](oxiflap_evaluator::Genotype::random)), since the
//! Xavier bounds are a property of the architecture, not of the trainer.

use rand::Rng;
use rand_distr::{Distribution as _, Normal};

/// Blend crossover biased toward the fitter parent.
///
/// Each offspring weight is `w1·x1 + w2·x2` where the blend weights are the
/// parents' shares of their combined fitness. When the combined fitness is
/// not positive (for example in the very first generation, before any
/// meaningful scores exist), the blend degenerates to an even 50/50 average.
///
/// # Panics
///
/// Panics if the parent vectors have different lengths.
#[must_use]
pub fn blend(p1: &[f32], f1: f32, p2: &[f32], f2: f32) -> Vec<f32> {
    assert_eq!(p1.len(), p2.len());
    let total = f1 + f2;
    let (w1, w2) = if total > 0.0 {
        (f1 / total, f2 / total)
    } else {
        (0.5, 0.5)
    };
    p1.iter()
        .zip(p2)
        .map(|(&x1, &x2)| w1 * x1 + w2 * x2)
        .collect()
}

/// Uniform crossover: each weight is copied from a randomly chosen parent.
///
/// # Panics
///
/// Panics if the parent vectors have different lengths.
#[must_use]
pub fn uniform<R>(p1: &[f32], p2: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    p1.iter()
        .zip(p2)
        .map(|(&x1, &x2)| if rng.random_bool(0.5) { x1 } else { x2 })
        .collect()
}

/// Single-point crossover: prefix from the first parent, suffix from the
/// second, cut at a random interior point.
///
/// # Panics
///
/// Panics if the parent vectors have different lengths or fewer than two
/// weights.
#[must_use]
pub fn single_point<R>(p1: &[f32], p2: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    let cut = rng.random_range(1..p1.len());
    let mut child = Vec::with_capacity(p1.len());
    child.extend_from_slice(&p1[..cut]);
    child.extend_from_slice(&p2[cut..]);
    child
}

/// Applies additive Gaussian mutation to every weight in-place, clamping the
/// result to `[-clip, clip]`.
///
/// The clamp guarantees weights cannot drift unboundedly no matter how large
/// the sampled noise is.
pub fn mutate<R>(weights: &mut [f32], sigma: f32, clip: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).unwrap();
    for weight in weights {
        *weight = (*weight + normal.sample(rng)).clamp(-clip, clip);
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    #[test]
    fn blend_is_biased_toward_the_fitter_parent() {
        let child = blend(&[0.0, 0.0], 300.0, &[1.0, 1.0], 100.0);
        // Fitter parent contributes 75% of each weight.
        assert_eq!(child, vec![0.25, 0.25]);
    }

    #[test]
    fn blend_degenerates_to_even_average_without_fitness() {
        let child = blend(&[0.0, 2.0], 0.0, &[1.0, 0.0], 0.0);
        assert_eq!(child, vec![0.5, 1.0]);
    }

    #[test]
    fn uniform_only_copies_parent_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        let p1 = [1.0f32; 16];
        let p2 = [2.0f32; 16];
        let child = uniform(&p1, &p2, &mut rng);
        assert!(child.iter().all(|&w| w == 1.0 || w == 2.0));
        // With 16 weights both parents are virtually certain to contribute.
        assert!(child.contains(&1.0) && child.contains(&2.0));
    }

    #[test]
    fn single_point_keeps_a_prefix_and_a_suffix() {
        let mut rng = StdRng::seed_from_u64(2);
        let p1: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let p2: Vec<f32> = (0..10).map(|i| -(i as f32) - 1.0).collect();
        let child = single_point(&p1, &p2, &mut rng);
        let cut = child.iter().position(|&w| w < 0.0).unwrap();
        assert!(cut >= 1);
        assert_eq!(child[..cut], p1[..cut]);
        assert_eq!(child[cut..], p2[cut..]);
    }

    #[test]
    fn mutation_respects_the_clip_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        // A sigma far larger than the clip bound still cannot push any
        // weight outside it.
        let mut weights = vec![0.0f32; 256];
        mutate(&mut weights, 100.0, 3.0, &mut rng);
        assert!(weights.iter().all(|w| w.abs() <= 3.0));
        // With such extreme noise nearly everything lands on the bound.
        assert!(weights.iter().any(|&w| w == 3.0 || w == -3.0));
    }

    #[test]
    fn mutation_perturbs_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut weights = vec![0.5f32; 64];
        mutate(&mut weights, 0.1, 3.0, &mut rng);
        assert!(weights.iter().any(|&w| w != 0.5));
    }
}
