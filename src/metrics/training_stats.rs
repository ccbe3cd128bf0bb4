//! Per-generation training statistics
//!
//! Tracks generation-level metrics (best and average fitness, best length and
//! score) using rolling windows for smoothed statistics, plus best-ever records
//! across the whole run.

use std::collections::VecDeque;

use crate::brain::{Brain, EvaluatorKind};
use crate::evolution::diversity;
use crate::evolution::selection::cmp_fitness;
use crate::game::SnakeAgent;

/// Snapshot of one finished generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// Generation index, starting at 0
    pub generation: usize,
    pub best_fitness: f64,
    pub average_fitness: f64,
    pub best_score: f64,
    pub best_length: usize,
    pub average_length: f64,
    /// Ticks simulated before every agent stopped
    pub ticks: u64,
    pub diversity: f64,
    pub converged: bool,
    /// Brain of the fittest agent
    pub best_brain: Brain,
    pub evaluator: EvaluatorKind,
}

impl GenerationSummary {
    /// Summarise a population. An empty one yields zeros and an empty brain.
    pub fn from_population(generation: usize, population: &[SnakeAgent], ticks: u64) -> Self {
        let n = population.len().max(1) as f64;
        let best = population
            .iter()
            .max_by(|a, b| cmp_fitness(a.fitness, b.fitness));

        Self {
            generation,
            best_fitness: best.map_or(0.0, |a| a.fitness),
            average_fitness: population.iter().map(|a| a.fitness).sum::<f64>() / n,
            best_score: population.iter().map(|a| a.score).fold(0.0, f64::max),
            best_length: population.iter().map(|a| a.length).max().unwrap_or(0),
            average_length: population.iter().map(|a| a.length as f64).sum::<f64>() / n,
            ticks,
            diversity: diversity(population.iter().map(|a| &a.brain)),
            converged: false,
            best_brain: best.map_or_else(|| Brain::new(Vec::new()), |a| a.brain.clone()),
            evaluator: best.map_or(EvaluatorKind::default(), |a| a.evaluator),
        }
    }
}

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use ga_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(10);
/// stats.record(450.0, 120.0, 6, 380.0, 900);
///
/// assert_eq!(stats.total_generations(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Best fitness per generation (rolling window)
    best_fitness: VecDeque<f64>,

    /// Average fitness per generation (rolling window)
    average_fitness: VecDeque<f64>,

    /// Best length per generation (rolling window)
    best_lengths: VecDeque<usize>,

    /// Best in-game score per generation (rolling window)
    best_scores: VecDeque<f64>,

    total_generations: usize,
    total_ticks: u64,

    best_ever_fitness: f64,
    best_ever_score: f64,
    best_ever_length: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new tracker keeping the last `window_size` generations
    pub fn new(window_size: usize) -> Self {
        Self {
            best_fitness: VecDeque::with_capacity(window_size),
            average_fitness: VecDeque::with_capacity(window_size),
            best_lengths: VecDeque::with_capacity(window_size),
            best_scores: VecDeque::with_capacity(window_size),
            total_generations: 0,
            total_ticks: 0,
            best_ever_fitness: 0.0,
            best_ever_score: 0.0,
            best_ever_length: 0,
            window_size,
        }
    }

    /// Record the outcome of a generation
    pub fn record(
        &mut self,
        best_fitness: f64,
        average_fitness: f64,
        best_length: usize,
        best_score: f64,
        ticks: u64,
    ) {
        Self::push_deque(&mut self.best_fitness, best_fitness, self.window_size);
        Self::push_deque(&mut self.average_fitness, average_fitness, self.window_size);
        Self::push_deque(&mut self.best_lengths, best_length, self.window_size);
        Self::push_deque(&mut self.best_scores, best_score, self.window_size);

        self.total_generations += 1;
        self.total_ticks += ticks;
        self.best_ever_fitness = self.best_ever_fitness.max(best_fitness);
        self.best_ever_score = self.best_ever_score.max(best_score);
        self.best_ever_length = self.best_ever_length.max(best_length);
    }

    pub fn record_summary(&mut self, summary: &GenerationSummary) {
        self.record(
            summary.best_fitness,
            summary.average_fitness,
            summary.best_length,
            summary.best_score,
            summary.ticks,
        );
    }

    /// Mean of the per-generation best fitness over the window
    pub fn mean_best_fitness(&self) -> f64 {
        Self::mean(&self.best_fitness)
    }

    pub fn mean_average_fitness(&self) -> f64 {
        Self::mean(&self.average_fitness)
    }

    pub fn mean_best_length(&self) -> f64 {
        if self.best_lengths.is_empty() {
            0.0
        } else {
            self.best_lengths.iter().sum::<usize>() as f64 / self.best_lengths.len() as f64
        }
    }

    pub fn mean_best_score(&self) -> f64 {
        Self::mean(&self.best_scores)
    }

    pub fn best_ever_fitness(&self) -> f64 {
        self.best_ever_fitness
    }

    pub fn best_ever_score(&self) -> f64 {
        self.best_ever_score
    }

    pub fn best_ever_length(&self) -> usize {
        self.best_ever_length
    }

    pub fn total_generations(&self) -> usize {
        self.total_generations
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Generations: {} | Ticks: {} | Best: {:.2} | Avg: {:.2} | Len: {:.1} | Best Ever: {:.2} (len {}, score {:.1})",
            self.total_generations,
            self.total_ticks,
            self.mean_best_fitness(),
            self.mean_average_fitness(),
            self.mean_best_length(),
            self.best_ever_fitness,
            self.best_ever_length,
            self.best_ever_score,
        )
    }

    fn mean(deque: &VecDeque<f64>) -> f64 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f64>() / deque.len() as f64
        }
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{SnakeFactory, World};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_new() {
        let stats = TrainingStats::new(10);
        assert_eq!(stats.window_size(), 10);
        assert_eq!(stats.total_generations(), 0);
        assert_eq!(stats.total_ticks(), 0);
    }

    #[test]
    fn test_record() {
        let mut stats = TrainingStats::new(10);
        stats.record(300.0, 100.0, 4, 250.0, 600);

        assert_eq!(stats.total_generations(), 1);
        assert_eq!(stats.total_ticks(), 600);
        assert!((stats.mean_best_fitness() - 300.0).abs() < 1e-9);
        assert!((stats.mean_average_fitness() - 100.0).abs() < 1e-9);
        assert!((stats.mean_best_length() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = TrainingStats::new(3);

        stats.record(1.0, 0.0, 1, 0.0, 10);
        stats.record(2.0, 0.0, 1, 0.0, 10);
        stats.record(3.0, 0.0, 1, 0.0, 10);
        assert!((stats.mean_best_fitness() - 2.0).abs() < 1e-9);

        // A 4th generation evicts the first
        stats.record(4.0, 0.0, 1, 0.0, 10);
        assert_eq!(stats.total_generations(), 4);
        assert!((stats.mean_best_fitness() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_ever_survives_window() {
        let mut stats = TrainingStats::new(2);
        stats.record(900.0, 10.0, 12, 800.0, 10);
        stats.record(100.0, 10.0, 2, 50.0, 10);
        stats.record(200.0, 10.0, 3, 60.0, 10);

        assert_eq!(stats.best_ever_fitness(), 900.0);
        assert_eq!(stats.best_ever_length(), 12);
        assert_eq!(stats.best_ever_score(), 800.0);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(10);
        stats.record(450.0, 120.0, 6, 380.0, 900);

        let summary = stats.format_summary();
        assert!(summary.contains("Generations: 1"));
        assert!(summary.contains("Ticks: 900"));
        assert!(summary.contains("Best: 450.00"));
        assert!(summary.contains("Avg: 120.00"));
        assert!(summary.contains("Len: 6.0"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = TrainingStats::new(10);
        assert_eq!(stats.mean_best_fitness(), 0.0);
        assert_eq!(stats.mean_average_fitness(), 0.0);
        assert_eq!(stats.mean_best_length(), 0.0);
        assert_eq!(stats.mean_best_score(), 0.0);
    }

    #[test]
    fn test_summary_of_empty_population() {
        let summary = GenerationSummary::from_population(0, &[], 0);
        assert_eq!(summary.best_fitness, 0.0);
        assert_eq!(summary.average_fitness, 0.0);
        assert_eq!(summary.best_length, 0);
        assert!(summary.best_brain.is_empty());
    }

    #[test]
    fn test_summary_picks_fittest() {
        let factory = SnakeFactory::new(World::default(), EvaluatorKind::Linear);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut population = factory.create_population(3, &mut rng).unwrap();
        population[0].fitness = 5.0;
        population[1].fitness = 50.0;
        population[2].fitness = 20.0;

        let summary = GenerationSummary::from_population(7, &population, 42);
        assert_eq!(summary.generation, 7);
        assert_eq!(summary.best_fitness, 50.0);
        assert!((summary.average_fitness - 25.0).abs() < 1e-9);
        assert_eq!(summary.best_brain, population[1].brain);
        assert_eq!(summary.ticks, 42);
    }
}
