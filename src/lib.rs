//! GA Snake - snake agents that learn to play through a genetic algorithm
//!
//! This library provides:
//! - Core game logic and the per-agent state machine (game module)
//! - The decision engine: brains, evaluators and lookahead search (brain module)
//! - Fitness, selection, crossover and adaptive mutation (evolution module)
//! - An explicit training session owning the population (session module)
//! - Training statistics and the generation log (metrics module)
//! - Headless training and demonstration modes (modes module)

pub mod brain;
pub mod error;
pub mod evolution;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod session;

pub use error::{ConfigError, GameError, SessionError};
