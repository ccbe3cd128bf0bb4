//! Parent selection over a slice of fitness values.
//!
//! Every selector returns an index into the slice, or `None` when the slice
//! is empty. NaN fitness ranks below every real value.

use std::cmp::Ordering;

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::EvolutionConfig;

/// Total order on fitness with NaN sorted first (lowest)
pub fn cmp_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Tournament,
    Rank,
    Roulette,
}

impl SelectionMethod {
    pub const ALL: [SelectionMethod; 3] = [
        SelectionMethod::Tournament,
        SelectionMethod::Rank,
        SelectionMethod::Roulette,
    ];

    /// Probability of each method in [`SelectionMethod::ALL`] order.
    ///
    /// Low diversity shifts weight from tournament to rank and roulette.
    pub fn mix(diversity: f64, config: &EvolutionConfig) -> [f64; 3] {
        if diversity < config.selection_diversity_threshold {
            [0.2, 0.4, 0.4]
        } else {
            [0.6, 0.2, 0.2]
        }
    }

    pub fn pick<R: Rng + ?Sized>(diversity: f64, config: &EvolutionConfig, rng: &mut R) -> Self {
        match WeightedIndex::new(Self::mix(diversity, config)) {
            Ok(dist) => Self::ALL[dist.sample(rng)],
            Err(_) => SelectionMethod::Tournament,
        }
    }

    pub fn select<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        tournament_size: usize,
        rng: &mut R,
    ) -> Option<usize> {
        match self {
            SelectionMethod::Tournament => tournament(fitness, tournament_size, rng),
            SelectionMethod::Rank => rank(fitness, rng),
            SelectionMethod::Roulette => roulette(fitness, rng),
        }
    }
}

/// Fittest of `size` distinct random entries
pub fn tournament<R: Rng + ?Sized>(fitness: &[f64], size: usize, rng: &mut R) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    let size = size.clamp(1, fitness.len());
    index::sample(rng, fitness.len(), size)
        .iter()
        .max_by(|&a, &b| cmp_fitness(fitness[a], fitness[b]))
}

/// Probability grows linearly with rank; the weakest has weight 1
pub fn rank<R: Rng + ?Sized>(fitness: &[f64], rng: &mut R) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| cmp_fitness(fitness[a], fitness[b]));

    let dist = WeightedIndex::new(1..=order.len()).ok()?;
    Some(order[dist.sample(rng)])
}

/// Proportional to fitness after shifting the minimum to zero.
///
/// Falls back to a uniform pick when every shifted value is zero.
pub fn roulette<R: Rng + ?Sized>(fitness: &[f64], rng: &mut R) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    let min = fitness
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(f64::INFINITY, f64::min);
    let shift = if min < 0.0 { -min } else { 0.0 };

    let weights = fitness.iter().map(|&f| {
        let w = f + shift;
        if w.is_finite() && w > 0.0 {
            w
        } else {
            0.0
        }
    });

    match WeightedIndex::new(weights) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => Some(rng.gen_range(0..fitness.len())),
    }
}
