use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables of the lookahead decision engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Recursion depth for long snakes
    pub base_depth: usize,
    /// Snakes shorter than this search one level deeper
    pub shallow_length: usize,
    /// Weight of the best follow-up score
    pub future_discount: f64,
    /// Score of a move into a wall or the body
    pub collision_score: f64,
    /// Follow-up scores below this are replaced by `future_floor_penalty`
    pub future_floor: f64,
    pub future_floor_penalty: f64,
    /// Raw reward for a candidate that lands on food
    pub food_reward: f64,
    /// Skip the wall penalty when the food itself sits next to a wall
    pub wall_exception_near_food: bool,
    /// Identical trailing moves needed for the momentum bonus
    pub momentum_run: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_depth: 2,
            shallow_length: 10,
            future_discount: 0.7,
            collision_score: -1000.0,
            future_floor: -50.0,
            future_floor_penalty: -30.0,
            food_reward: 75.0,
            wall_exception_near_food: true,
            momentum_run: 3,
        }
    }
}

impl SearchConfig {
    /// Deepest recursion level for a snake of `length`
    pub fn max_depth(&self, length: usize) -> usize {
        if length < self.shallow_length {
            self.base_depth + 1
        } else {
            self.base_depth
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.future_discount) {
            return Err(ConfigError::OutOfRange {
                field: "future_discount",
                value: self.future_discount,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.base_depth > 6 {
            return Err(ConfigError::OutOfRange {
                field: "base_depth",
                value: self.base_depth as f64,
                min: 0.0,
                max: 6.0,
            });
        }
        if self.collision_score >= self.future_floor {
            return Err(ConfigError::Invalid(format!(
                "collision_score ({}) must be below future_floor ({})",
                self.collision_score, self.future_floor
            )));
        }
        Ok(())
    }
}
