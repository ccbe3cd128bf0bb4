//! Core game logic for the evolving snakes
//!
//! No I/O or rendering: a board, its rules and the agent state machine that
//! moves one snake per tick.

pub mod action;
pub mod config;
pub mod engine;
pub mod history;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{spawn_food, DeathCause, SnakeAgent, SnakeFactory, StepInfo, World};
pub use history::MoveHistory;
pub use state::{CellKind, Grid, Position, Snake};
