//! Summary statistics for training logs.

/// Fitness distribution summary for one generation.
#[derive(Debug, Clone, Copy)]
pub struct FitnessStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std_dev: f32,
}

impl FitnessStats {
    /// Computes summary statistics over a fitness sample.
    ///
    /// Returns `None` for an empty sample.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let values: Vec<f32> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }
        let len = values.len() as f32;
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = values.iter().sum::<f32>() / len;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / len;
        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
