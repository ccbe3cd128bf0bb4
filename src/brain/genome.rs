use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bound of the uniform range random genes are drawn from
const RANDOM_GENE_BOUND: f64 = 1.5;

/// Heritable weight vector driving an agent's evaluator.
///
/// Serializes as a flat array of floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Brain(Vec<f64>);

impl Brain {
    pub fn new(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Uniform genes in [-1.5, 1.5], scaled to unit L2 norm
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut weights: Vec<f64> = (0..len)
            .map(|_| rng.gen_range(-RANDOM_GENE_BOUND..=RANDOM_GENE_BOUND))
            .collect();
        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > f64::EPSILON {
            for w in &mut weights {
                *w /= norm;
            }
        }
        Self(weights)
    }

    pub fn weights(&self) -> &[f64] {
        &self.0
    }

    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gene at `index`, or 0.0 past the end
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    /// Zero-pad or truncate to exactly `len` genes
    pub fn fitted(mut self, len: usize) -> Self {
        self.0.resize(len, 0.0);
        self
    }

    /// Euclidean distance, treating missing genes as zero
    pub fn distance(&self, other: &Brain) -> f64 {
        let len = self.len().max(other.len());
        (0..len)
            .map(|i| {
                let d = self.get(i) - other.get(i);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl From<Vec<f64>> for Brain {
    fn from(weights: Vec<f64>) -> Self {
        Self(weights)
    }
}
