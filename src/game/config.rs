use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evolution::FitnessFormula;

/// Board and rule configuration shared by every agent of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playable area in cells
    pub grid_width: usize,
    /// Height of the playable area in cells
    pub grid_height: usize,
    /// Size of one cell in pixels (display mapping only)
    pub cell_size: i32,
    /// Pixel offset of the playable area's top-left cell
    pub origin: (i32, i32),

    /// Simulated seconds that elapse per tick
    pub tick_seconds: f64,
    /// Seconds without food before an agent starves
    pub starvation_seconds: f64,
    /// Agents at least this long never starve
    pub starvation_immune_length: usize,

    /// Score added when food is eaten
    pub food_bonus: f64,
    /// Flat score added every surviving tick
    pub survival_base: f64,
    /// Score added every surviving tick per unit of length
    pub survival_per_length: f64,

    /// Minimum size of the loop detection window
    pub loop_window: usize,
    /// Length from which the higher loop threshold applies
    pub loop_long_length: usize,
    /// Repeat count that flags a loop for short snakes
    pub loop_threshold_short: usize,
    /// Repeat count that flags a loop for long snakes
    pub loop_threshold_long: usize,
    /// Fitness deducted on every detected loop
    pub loop_penalty: f64,
    /// Probability that a detected loop kills the agent
    pub loop_death_probability: f64,

    /// Formula used to compute fitness
    pub fitness: FitnessFormula,
    /// Random placements tried before falling back to a scan
    pub max_spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 28,
            grid_height: 28,
            cell_size: 20,
            origin: (20, 70),
            tick_seconds: 1.0 / 60.0,
            starvation_seconds: 10.0,
            starvation_immune_length: 500,
            food_bonus: 50.0,
            survival_base: 1.0,
            survival_per_length: 2.5,
            loop_window: 15,
            loop_long_length: 10,
            loop_threshold_short: 3,
            loop_threshold_long: 4,
            loop_penalty: 50.0,
            loop_death_probability: 0.5,
            fitness: FitnessFormula::Normalized,
            max_spawn_attempts: 10_000,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Number of ticks covering `seconds` of simulated time
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        (seconds / self.tick_seconds).round() as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.cell_size <= 0 {
            return Err(ConfigError::NotPositive {
                field: "cell_size",
                value: self.cell_size as f64,
            });
        }
        if self.tick_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "tick_seconds",
                value: self.tick_seconds,
            });
        }
        if self.starvation_seconds <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "starvation_seconds",
                value: self.starvation_seconds,
            });
        }
        if !(0.0..=1.0).contains(&self.loop_death_probability) {
            return Err(ConfigError::OutOfRange {
                field: "loop_death_probability",
                value: self.loop_death_probability,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.loop_threshold_short == 0 || self.loop_threshold_long == 0 {
            return Err(ConfigError::Invalid(
                "loop thresholds must be at least 1".to_string(),
            ));
        }
        if self.max_spawn_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_spawn_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
