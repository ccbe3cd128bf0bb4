//! Scoring strategies that turn candidate features into a move score.
//!
//! Both evaluators read the same [`CandidateFeatures`]; they differ in how
//! the brain vector is laid out.

use serde::{Deserialize, Serialize};

use super::features::CandidateFeatures;
use super::genome::Brain;

pub const LINEAR_GENOME_LEN: usize = 9;
pub const NETWORK_GENOME_LEN: usize = 15;

/// Labels of the linear heuristic's genes, in gene order
pub const LINEAR_LABELS: [&str; LINEAR_GENOME_LEN] = [
    "Food Bonus",
    "Toward Food",
    "Away Penalty",
    "Loop Penalty",
    "Survival Bonus",
    "Wall Penalty",
    "Exploration Bonus",
    "Momentum Bonus",
    "Dead-End Penalty",
];

const LOOP_PENALTY: f64 = -20.0;
const DEPTH_LOOP_PENALTY: f64 = -10.0;
const WALL_PENALTY: f64 = -3.0;
const MOMENTUM_BONUS: f64 = 10.0;
const DEAD_END_PENALTY: f64 = -20.0;
const NETWORK_SCALE: f64 = 100.0;

/// Maps the features of one candidate move and a brain to a score
pub trait Evaluator {
    /// Number of genes the evaluator reads
    fn genome_len(&self) -> usize;

    fn evaluate(&self, features: &CandidateFeatures, brain: &Brain) -> f64;
}

/// Hand-shaped heuristic terms, each scaled by one gene
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearHeuristic;

impl Evaluator for LinearHeuristic {
    fn genome_len(&self) -> usize {
        LINEAR_GENOME_LEN
    }

    fn evaluate(&self, f: &CandidateFeatures, brain: &Brain) -> f64 {
        let food = brain.get(0) * f.food_reward;
        let toward_food = brain.get(1) * -(f.food_distance as f64);

        let revisited = f.visit_count > 1;
        let mut loop_term = if revisited {
            brain.get(3) * LOOP_PENALTY * f.visit_count as f64
        } else {
            0.0
        };
        // Revisits found deeper in the search cost extra regardless of the gene
        if f.depth > 0 && revisited {
            loop_term += DEPTH_LOOP_PENALTY * f.depth as f64;
        }

        let wall = if f.wall_hazard {
            brain.get(5) * WALL_PENALTY
        } else {
            0.0
        };
        let exploration = brain.get(6) * f.exploration;
        let momentum = if f.momentum {
            brain.get(7) * MOMENTUM_BONUS
        } else {
            0.0
        };
        let dead_end = if f.blocked_onward >= 2 {
            brain.get(8) * DEAD_END_PENALTY
        } else {
            0.0
        };

        food + toward_food + loop_term + wall + exploration + momentum + dead_end
    }
}

/// Tiny feed-forward network: 8 inputs, 4 tanh hidden units, sigmoid output.
///
/// Gene layout: hidden unit `k` reads inputs `2k` and `2k+1` through genes
/// `2k` and `2k+1`; genes 8..12 are output weights; gene 12 biases hidden
/// units 0-1, gene 13 hidden units 2-3 and gene 14 the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedForward;

impl FeedForward {
    const HIDDEN: usize = 4;

    pub fn forward(inputs: &[f64; 8], brain: &Brain) -> f64 {
        let mut activation = brain.get(14);
        for k in 0..Self::HIDDEN {
            let bias = if k < 2 { brain.get(12) } else { brain.get(13) };
            let pre = brain.get(2 * k) * inputs[2 * k] + brain.get(2 * k + 1) * inputs[2 * k + 1] + bias;
            activation += brain.get(8 + k) * pre.tanh();
        }
        sigmoid(activation)
    }
}

impl Evaluator for FeedForward {
    fn genome_len(&self) -> usize {
        NETWORK_GENOME_LEN
    }

    fn evaluate(&self, features: &CandidateFeatures, brain: &Brain) -> f64 {
        NETWORK_SCALE * Self::forward(&features.network_inputs(), brain)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Evaluator chosen for an agent at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    #[default]
    Linear,
    Network,
}

impl EvaluatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            EvaluatorKind::Linear => "linear",
            EvaluatorKind::Network => "network",
        }
    }

    /// Human-readable name of gene `index`
    pub fn gene_label(&self, index: usize) -> String {
        match self {
            EvaluatorKind::Linear => LINEAR_LABELS
                .get(index)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("Gene {}", index)),
            EvaluatorKind::Network => match index {
                0..=7 => format!("Hidden Weight {}", index),
                8..=11 => format!("Output Weight {}", index - 8),
                12 => "Hidden Bias A".to_string(),
                13 => "Hidden Bias B".to_string(),
                14 => "Output Bias".to_string(),
                _ => format!("Gene {}", index),
            },
        }
    }
}

impl Evaluator for EvaluatorKind {
    fn genome_len(&self) -> usize {
        match self {
            EvaluatorKind::Linear => LinearHeuristic.genome_len(),
            EvaluatorKind::Network => FeedForward.genome_len(),
        }
    }

    fn evaluate(&self, features: &CandidateFeatures, brain: &Brain) -> f64 {
        match self {
            EvaluatorKind::Linear => LinearHeuristic.evaluate(features, brain),
            EvaluatorKind::Network => FeedForward.evaluate(features, brain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> CandidateFeatures {
        CandidateFeatures {
            depth: 0,
            food_reward: 0.0,
            food_distance: 4,
            food_delta: (4, 0),
            visit_count: 0,
            wall_hazard: false,
            wall_distance: (3, 3),
            exploration: 0.0,
            momentum: false,
            blocked_onward: 0,
            safe_onward: 4,
            length: 0,
            grid_span: (10, 10),
        }
    }

    fn unit(index: usize) -> Brain {
        let mut brain = Brain::zeros(LINEAR_GENOME_LEN);
        brain.weights_mut()[index] = 1.0;
        brain
    }

    #[test]
    fn test_zero_brain_scores_zero() {
        let brain = Brain::zeros(LINEAR_GENOME_LEN);
        assert_eq!(LinearHeuristic.evaluate(&features(), &brain), 0.0);
    }

    #[test]
    fn test_toward_food_term() {
        assert_eq!(LinearHeuristic.evaluate(&features(), &unit(1)), -4.0);
    }

    #[test]
    fn test_food_reward_term() {
        let f = CandidateFeatures {
            food_reward: 75.0,
            ..features()
        };
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(0)), 75.0);
    }

    #[test]
    fn test_loop_term_scales_with_visits() {
        let f = CandidateFeatures {
            visit_count: 3,
            ..features()
        };
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(3)), -60.0);

        let single = CandidateFeatures {
            visit_count: 1,
            ..features()
        };
        assert_eq!(LinearHeuristic.evaluate(&single, &unit(3)), 0.0);
    }

    #[test]
    fn test_deep_revisit_penalty_ignores_genes() {
        let f = CandidateFeatures {
            visit_count: 2,
            depth: 2,
            ..features()
        };
        let brain = Brain::zeros(LINEAR_GENOME_LEN);
        assert_eq!(LinearHeuristic.evaluate(&f, &brain), -20.0);
    }

    #[test]
    fn test_remaining_terms() {
        let f = CandidateFeatures {
            wall_hazard: true,
            momentum: true,
            blocked_onward: 2,
            exploration: 0.5,
            ..features()
        };
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(5)), -3.0);
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(6)), 0.5);
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(7)), 10.0);
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(8)), -20.0);
        // reserved genes are ignored
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(2)), 0.0);
        assert_eq!(LinearHeuristic.evaluate(&f, &unit(4)), 0.0);
    }

    #[test]
    fn test_network_zero_brain_is_midpoint() {
        let brain = Brain::zeros(NETWORK_GENOME_LEN);
        let score = FeedForward.evaluate(&features(), &brain);
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_network_output_bounded() {
        let brain = Brain::new(vec![5.0; NETWORK_GENOME_LEN]);
        let score = FeedForward.evaluate(&features(), &brain);
        assert!(score > 0.0 && score < 100.0);
    }

    #[test]
    fn test_network_accepts_short_brain() {
        let short = Brain::new(vec![0.3; LINEAR_GENOME_LEN]);
        let padded = short.clone().fitted(NETWORK_GENOME_LEN);
        assert_eq!(
            FeedForward.evaluate(&features(), &short),
            FeedForward.evaluate(&features(), &padded)
        );
    }

    #[test]
    fn test_kind_dispatch() {
        assert_eq!(EvaluatorKind::Linear.genome_len(), 9);
        assert_eq!(EvaluatorKind::Network.genome_len(), 15);
        assert_eq!(EvaluatorKind::Linear.gene_label(8), "Dead-End Penalty");
        assert_eq!(EvaluatorKind::Network.gene_label(14), "Output Bias");
    }
}
