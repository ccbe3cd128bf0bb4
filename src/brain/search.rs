//! Depth-limited lookahead over the four cardinal moves.
//!
//! Each candidate is scored by the evaluator, then (while depth allows) the
//! best follow-up score is folded in with a discount. Moves into a wall or
//! the body get the collision sentinel and are not expanded.

use rand::Rng;

use super::config::SearchConfig;
use super::evaluator::Evaluator;
use super::features::CandidateFeatures;
use super::genome::Brain;
use crate::game::{Direction, Grid, MoveHistory, Position};

/// Read-only view of the agent state the search needs
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub grid: &'a Grid,
    pub body: &'a [Position],
    pub food: Position,
    pub history: &'a MoveHistory,
    pub length: usize,
}

pub struct LookaheadSearch<'a, E: Evaluator> {
    config: &'a SearchConfig,
    evaluator: &'a E,
    brain: &'a Brain,
    ctx: SearchContext<'a>,
    max_depth: usize,
    exploration: f64,
}

impl<'a, E: Evaluator> LookaheadSearch<'a, E> {
    pub fn new(
        config: &'a SearchConfig,
        evaluator: &'a E,
        brain: &'a Brain,
        ctx: SearchContext<'a>,
    ) -> Self {
        let moves = ctx.history.len() as f64;
        let exploration =
            ctx.history.unique_positions() as f64 / (moves + 1.0) * (-0.05 * moves).exp();

        Self {
            config,
            evaluator,
            brain,
            ctx,
            max_depth: config.max_depth(ctx.length),
            exploration,
        }
    }

    /// Best direction from the current head.
    ///
    /// Ties go to the earliest direction in [`Direction::ALL`]. When every
    /// move collides the choice is uniformly random.
    pub fn choose_direction<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        let head = self.ctx.body[0];
        let mut best: Option<(Direction, f64)> = None;

        for direction in Direction::ALL {
            let Some(score) = self.candidate_score(head, direction, 0) else {
                continue;
            };
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((direction, score));
            }
        }

        match best {
            Some((direction, _)) => direction,
            None => Direction::random(rng),
        }
    }

    /// Total score of every candidate from the head, sentinel included
    pub fn scores(&self) -> [(Direction, f64); 4] {
        let head = self.ctx.body[0];
        Direction::ALL.map(|d| (d, self.score_move(head, d, 0)))
    }

    fn score_move(&self, from: Position, direction: Direction, depth: usize) -> f64 {
        self.candidate_score(from, direction, depth)
            .unwrap_or(self.config.collision_score)
    }

    /// `None` when the move collides
    fn candidate_score(&self, from: Position, direction: Direction, depth: usize) -> Option<f64> {
        let pos = from.moved_in_direction(direction);
        if self.collides(pos) {
            return None;
        }

        let features = self.features(pos, direction, depth);
        let mut total = self.evaluator.evaluate(&features, self.brain);
        if total.is_nan() {
            total = self.config.collision_score;
        }

        if depth < self.max_depth {
            let best_future = Direction::ALL
                .iter()
                .map(|d| self.score_move(pos, *d, depth + 1))
                .fold(f64::NEG_INFINITY, f64::max);
            total += if best_future >= self.config.future_floor {
                best_future * self.config.future_discount
            } else {
                self.config.future_floor_penalty
            };
        }

        Some(total)
    }

    fn collides(&self, pos: Position) -> bool {
        self.ctx.grid.is_wall(pos) || self.ctx.body.contains(&pos)
    }

    fn features(&self, pos: Position, direction: Direction, depth: usize) -> CandidateFeatures {
        let ctx = &self.ctx;
        let food = ctx.food;

        let onward = Direction::ALL.map(|d| pos.moved_in_direction(d));
        let blocked_onward = onward.iter().filter(|p| ctx.body.contains(p)).count();
        let safe_onward = onward.iter().filter(|p| !self.collides(**p)).count();

        let food_near_wall = ctx.grid.is_near_wall(food);
        let wall_hazard = ctx.grid.is_near_wall(pos)
            && !(self.config.wall_exception_near_food && food_near_wall);

        CandidateFeatures {
            depth,
            food_reward: if pos == food {
                self.config.food_reward
            } else {
                0.0
            },
            food_distance: pos.manhattan(food),
            food_delta: (food.x - pos.x, food.y - pos.y),
            visit_count: ctx.history.visit_count(pos),
            wall_hazard,
            wall_distance: ctx.grid.wall_distance(pos),
            exploration: self.exploration,
            momentum: ctx.history.streak(self.config.momentum_run) == Some(direction),
            blocked_onward,
            safe_onward,
            length: ctx.length,
            grid_span: (ctx.grid.width(), ctx.grid.height()),
        }
    }
}
