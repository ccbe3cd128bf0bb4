use std::collections::HashMap;

use super::action::Direction;
use super::state::Position;

/// Positions and directions an agent has taken during one episode.
///
/// Grows for the whole episode; a fresh history is created with every agent.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    positions: Vec<Position>,
    directions: Vec<Direction>,
    visits: HashMap<Position, usize>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: Position, direction: Direction) {
        self.positions.push(position);
        self.directions.push(direction);
        *self.visits.entry(position).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// How often `pos` has been entered this episode
    pub fn visit_count(&self, pos: Position) -> usize {
        self.visits.get(&pos).copied().unwrap_or(0)
    }

    pub fn unique_positions(&self) -> usize {
        self.visits.len()
    }

    /// Direction of the last `run` moves if they were all the same
    pub fn streak(&self, run: usize) -> Option<Direction> {
        if run == 0 || self.directions.len() < run {
            return None;
        }
        let tail = &self.directions[self.directions.len() - run..];
        let first = tail[0];
        tail.iter().all(|d| *d == first).then_some(first)
    }

    /// Highest repeat count of any position among the last `window` entries.
    ///
    /// Returns `None` until at least `window` positions have been recorded.
    pub fn max_repeats(&self, window: usize) -> Option<usize> {
        if window == 0 || self.positions.len() < window {
            return None;
        }
        let mut counts: HashMap<Position, usize> = HashMap::with_capacity(window);
        for pos in &self.positions[self.positions.len() - window..] {
            *counts.entry(*pos).or_insert(0) += 1;
        }
        counts.values().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_counts() {
        let mut history = MoveHistory::new();
        let a = Position::new(1, 1);
        let b = Position::new(1, 2);
        history.record(a, Direction::Down);
        history.record(b, Direction::Down);
        history.record(a, Direction::Up);

        assert_eq!(history.len(), 3);
        assert_eq!(history.visit_count(a), 2);
        assert_eq!(history.visit_count(b), 1);
        assert_eq!(history.visit_count(Position::new(9, 9)), 0);
        assert_eq!(history.unique_positions(), 2);
    }

    #[test]
    fn test_streak() {
        let mut history = MoveHistory::new();
        assert_eq!(history.streak(3), None);
        for x in 0..3 {
            history.record(Position::new(x, 0), Direction::Right);
        }
        assert_eq!(history.streak(3), Some(Direction::Right));
        history.record(Position::new(2, 1), Direction::Down);
        assert_eq!(history.streak(3), None);
        assert_eq!(history.streak(1), Some(Direction::Down));
    }

    #[test]
    fn test_max_repeats_needs_full_window() {
        let mut history = MoveHistory::new();
        for _ in 0..5 {
            history.record(Position::new(0, 0), Direction::Left);
        }
        assert_eq!(history.max_repeats(15), None);
        assert_eq!(history.max_repeats(5), Some(5));
    }

    #[test]
    fn test_max_repeats_only_counts_window() {
        let mut history = MoveHistory::new();
        let hot = Position::new(3, 3);
        for _ in 0..4 {
            history.record(hot, Direction::Left);
        }
        for x in 0..15 {
            history.record(Position::new(x, 9), Direction::Right);
        }
        assert_eq!(history.max_repeats(15), Some(1));
        assert_eq!(history.max_repeats(19), Some(4));
    }
}
