use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::brain::Brain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    SinglePoint,
    Uniform,
    MultiPoint,
}

impl CrossoverMethod {
    pub const ALL: [CrossoverMethod; 3] = [
        CrossoverMethod::SinglePoint,
        CrossoverMethod::Uniform,
        CrossoverMethod::MultiPoint,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Child of `a` and `b`, as long as the longer parent
    pub fn apply<R: Rng + ?Sized>(&self, a: &Brain, b: &Brain, rng: &mut R) -> Brain {
        match self {
            CrossoverMethod::SinglePoint => single_point(a, b, rng),
            CrossoverMethod::Uniform => uniform(a, b, rng),
            CrossoverMethod::MultiPoint => multi_point(a, b, rng),
        }
    }
}

fn genome_len(a: &Brain, b: &Brain) -> usize {
    a.len().max(b.len())
}

/// Genes before a random cut come from `a`, the rest from `b`
pub fn single_point<R: Rng + ?Sized>(a: &Brain, b: &Brain, rng: &mut R) -> Brain {
    let len = genome_len(a, b);
    if len < 2 {
        return a.clone().fitted(len);
    }
    let cut = rng.gen_range(1..len);
    splice(a, b, len, &[cut])
}

/// Each gene from either parent with equal probability
pub fn uniform<R: Rng + ?Sized>(a: &Brain, b: &Brain, rng: &mut R) -> Brain {
    let len = genome_len(a, b);
    (0..len)
        .map(|i| if rng.gen_bool(0.5) { a.get(i) } else { b.get(i) })
        .collect::<Vec<_>>()
        .into()
}

/// Two distinct cuts; the middle segment comes from `b`
pub fn multi_point<R: Rng + ?Sized>(a: &Brain, b: &Brain, rng: &mut R) -> Brain {
    let len = genome_len(a, b);
    if len < 3 {
        return single_point(a, b, rng);
    }
    let mut cuts: Vec<usize> = index::sample(rng, len - 1, 2)
        .iter()
        .map(|c| c + 1)
        .collect();
    cuts.sort_unstable();
    splice(a, b, len, &cuts)
}

/// Alternate parents at every cut, starting with `a`
fn splice(a: &Brain, b: &Brain, len: usize, cuts: &[usize]) -> Brain {
    (0..len)
        .map(|i| {
            let segment = cuts.iter().filter(|&&c| i >= c).count();
            if segment % 2 == 0 {
                a.get(i)
            } else {
                b.get(i)
            }
        })
        .collect::<Vec<_>>()
        .into()
}
