use std::collections::VecDeque;

use super::config::EvolutionConfig;

/// Flags a run whose best and average fitness have flattened out.
///
/// Reporting only: evolution carries on regardless.
#[derive(Debug, Clone)]
pub struct ConvergenceDetector {
    window: usize,
    best_variance: f64,
    average_variance: f64,
    min_improvement: f64,
    best: VecDeque<f64>,
    average: VecDeque<f64>,
}

impl ConvergenceDetector {
    pub fn new(config: &EvolutionConfig) -> Self {
        Self {
            window: config.convergence_window.max(2),
            best_variance: config.convergence_best_variance,
            average_variance: config.convergence_average_variance,
            min_improvement: config.convergence_improvement,
            best: VecDeque::new(),
            average: VecDeque::new(),
        }
    }

    /// Add one generation and report whether the window has converged
    pub fn record(&mut self, best: f64, average: f64) -> bool {
        self.best.push_back(best);
        self.average.push_back(average);
        while self.best.len() > self.window {
            self.best.pop_front();
            self.average.pop_front();
        }
        self.is_converged()
    }

    pub fn is_converged(&self) -> bool {
        if self.best.len() < self.window {
            return false;
        }
        variance(&self.best) < self.best_variance
            && variance(&self.average) < self.average_variance
            && self.improvement() < self.min_improvement
    }

    /// Relative change of the best fitness across the window
    pub fn improvement(&self) -> f64 {
        match (self.best.front(), self.best.back()) {
            (Some(&start), Some(&end)) if start.abs() > f64::EPSILON => (end - start) / start.abs(),
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

/// Population variance, zero for an empty sample
pub fn variance(values: &VecDeque<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ConvergenceDetector {
        ConvergenceDetector::new(&EvolutionConfig::default())
    }

    #[test]
    fn test_needs_full_window() {
        let mut d = detector();
        for _ in 0..4 {
            assert!(!d.record(500.0, 300.0));
        }
        assert!(d.record(500.0, 300.0));
    }

    #[test]
    fn test_improving_run_not_converged() {
        let mut d = detector();
        for g in 0..10 {
            d.record(100.0 + 50.0 * g as f64, 80.0 + 40.0 * g as f64);
        }
        assert!(!d.is_converged());
        assert_eq!(d.len(), 5);
    }

    #[test]
    fn test_small_steady_gain_converges() {
        let mut d = detector();
        for best in [1000.0, 1001.0, 1002.0, 1003.0, 1004.0] {
            d.record(best, 600.0);
        }
        // variance 2, improvement 0.4%
        assert!(d.is_converged());
    }

    #[test]
    fn test_noisy_average_blocks_convergence() {
        let mut d = detector();
        for avg in [100.0, 200.0, 100.0, 200.0, 100.0] {
            d.record(1000.0, avg);
        }
        assert!(!d.is_converged());
    }

    #[test]
    fn test_variance() {
        let values: VecDeque<f64> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        assert!((variance(&values) - 4.0).abs() < 1e-12);
    }
}
