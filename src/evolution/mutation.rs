use rand::Rng;
use rand_distr::StandardNormal;

use super::config::EvolutionConfig;
use crate::brain::Brain;

/// Whether the latest best fitness beat the one before it
pub fn improved(best_history: &[f64]) -> bool {
    matches!(best_history, [.., previous, latest] if latest > previous)
}

/// Mutation rate for the next generation.
///
/// Low after an improving generation and high after a stalled one, then
/// boosted when the population has lost diversity.
pub fn adaptive_rate(best_history: &[f64], diversity: f64, config: &EvolutionConfig) -> f64 {
    let base = if improved(best_history) {
        config.mutation_low
    } else {
        config.mutation_high
    };

    let factor = if diversity < config.low_diversity {
        config.low_diversity_factor
    } else if diversity < config.mid_diversity {
        config.mid_diversity_factor
    } else {
        1.0
    };

    base * factor
}

/// Add Gaussian noise scaled by `rate` to each gene with probability
/// `gene_probability`. Returns the number of genes touched.
pub fn mutate<R: Rng + ?Sized>(
    brain: &mut Brain,
    rate: f64,
    gene_probability: f64,
    rng: &mut R,
) -> usize {
    let mut touched = 0;
    for gene in brain.weights_mut() {
        if rng.gen_bool(gene_probability) {
            let noise: f64 = rng.sample(StandardNormal);
            *gene += noise * rate;
            touched += 1;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_rate_after_improvement() {
        let config = EvolutionConfig::default();
        assert_eq!(adaptive_rate(&[10.0, 20.0], 5.0, &config), 0.1);
        assert_eq!(adaptive_rate(&[20.0, 20.0], 5.0, &config), 0.3);
        // no history counts as stalled
        assert_eq!(adaptive_rate(&[], 5.0, &config), 0.3);
        assert_eq!(adaptive_rate(&[7.0], 5.0, &config), 0.3);
    }

    #[test]
    fn test_rate_diversity_factor() {
        let config = EvolutionConfig::default();
        let improving = [1.0, 2.0];
        assert!((adaptive_rate(&improving, 0.2, &config) - 0.2).abs() < 1e-12);
        assert!((adaptive_rate(&improving, 0.7, &config) - 0.15).abs() < 1e-12);
        assert!((adaptive_rate(&improving, 1.0, &config) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_probability_leaves_brain() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut brain = Brain::new(vec![0.5; 9]);
        assert_eq!(mutate(&mut brain, 0.3, 0.0, &mut rng), 0);
        assert_eq!(brain.weights(), &[0.5; 9]);
    }

    #[test]
    fn test_noise_scales_with_rate() {
        let mut rng = SmallRng::seed_from_u64(9);
        let spread = |rate: f64, rng: &mut SmallRng| {
            let mut sum = 0.0;
            for _ in 0..500 {
                let mut brain = Brain::zeros(9);
                mutate(&mut brain, rate, 1.0, rng);
                sum += brain.weights().iter().map(|g| g * g).sum::<f64>();
            }
            sum / (500.0 * 9.0)
        };
        let low = spread(0.1, &mut rng);
        let high = spread(0.3, &mut rng);
        assert!((low - 0.01).abs() < 0.003);
        assert!((high - 0.09).abs() < 0.02);
    }
}
