use crate::brain::Brain;

/// Mean pairwise Euclidean distance between brains. Zero for fewer than two.
pub fn diversity<'a, I>(brains: I) -> f64
where
    I: IntoIterator<Item = &'a Brain>,
{
    let brains: Vec<&Brain> = brains.into_iter().collect();
    let n = brains.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for (i, a) in brains.iter().enumerate() {
        for b in &brains[i + 1..] {
            total += a.distance(b);
        }
    }
    total / (n * (n - 1) / 2) as f64
}
