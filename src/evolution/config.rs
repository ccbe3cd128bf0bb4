use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How many of the fittest agents are carried over unchanged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elitism {
    Fixed(usize),
    /// Share of the population, rounded down
    Fraction(f64),
}

impl Elitism {
    /// Elite count for a population of `size`: at least one, at most `size`
    pub fn count(&self, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        let k = match *self {
            Elitism::Fixed(k) => k,
            Elitism::Fraction(share) => (size as f64 * share).floor() as usize,
        };
        k.clamp(1, size)
    }
}

impl Default for Elitism {
    fn default() -> Self {
        Elitism::Fixed(3)
    }
}

/// Genetic operator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub elitism: Elitism,
    pub tournament_size: usize,

    /// Mutation rate after a generation that improved the best fitness
    pub mutation_low: f64,
    /// Mutation rate after a stalled generation
    pub mutation_high: f64,
    /// Chance that a single gene receives noise
    pub gene_mutation_probability: f64,

    /// Diversity below which mutation is boosted by `low_diversity_factor`
    pub low_diversity: f64,
    pub low_diversity_factor: f64,
    /// Diversity below which mutation is boosted by `mid_diversity_factor`
    pub mid_diversity: f64,
    pub mid_diversity_factor: f64,

    /// Diversity below which selection favours rank and roulette
    pub selection_diversity_threshold: f64,

    /// Chance of inserting a random newcomer per offspring
    pub injection_probability: f64,
    /// Diversity below which the injection chance is multiplied
    pub injection_diversity_threshold: f64,
    pub injection_boost: f64,

    /// Generations examined by the convergence detector
    pub convergence_window: usize,
    pub convergence_best_variance: f64,
    pub convergence_average_variance: f64,
    /// Relative improvement under which the window counts as flat
    pub convergence_improvement: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            elitism: Elitism::default(),
            tournament_size: 3,
            mutation_low: 0.1,
            mutation_high: 0.3,
            gene_mutation_probability: 0.3,
            low_diversity: 0.5,
            low_diversity_factor: 2.0,
            mid_diversity: 1.0,
            mid_diversity_factor: 1.5,
            selection_diversity_threshold: 0.5,
            injection_probability: 0.05,
            injection_diversity_threshold: 0.3,
            injection_boost: 3.0,
            convergence_window: 5,
            convergence_best_variance: 10.0,
            convergence_average_variance: 20.0,
            convergence_improvement: 0.05,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.elitism {
            Elitism::Fraction(share) if !(0.0..=1.0).contains(&share) => {
                return Err(ConfigError::OutOfRange {
                    field: "elitism",
                    value: share,
                    min: 0.0,
                    max: 1.0,
                });
            }
            _ => {}
        }

        if self.tournament_size == 0 {
            return Err(ConfigError::NotPositive {
                field: "tournament_size",
                value: 0.0,
            });
        }

        for (field, value) in [
            ("gene_mutation_probability", self.gene_mutation_probability),
            ("injection_probability", self.injection_probability),
            (
                "boosted injection_probability",
                self.injection_probability * self.injection_boost,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }

        if self.mutation_low < 0.0 || self.mutation_high < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "mutation rates must be non-negative, got {} and {}",
                self.mutation_low, self.mutation_high
            )));
        }

        if self.convergence_window < 2 {
            return Err(ConfigError::Invalid(format!(
                "convergence_window must cover at least 2 generations, got {}",
                self.convergence_window
            )));
        }

        Ok(())
    }
}
