//! Genetic algorithm over agent brains: fitness, selection, crossover,
//! adaptive mutation, elitism and convergence reporting.

pub mod breed;
pub mod config;
pub mod convergence;
pub mod crossover;
pub mod diversity;
pub mod fitness;
pub mod mutation;
pub mod selection;

pub use breed::{breed, evolve, BreedStats, NextGeneration, ScoredBrain};
pub use config::{Elitism, EvolutionConfig};
pub use convergence::ConvergenceDetector;
pub use crossover::CrossoverMethod;
pub use diversity::diversity;
pub use fitness::{FitnessFormula, FitnessInputs};
pub use mutation::{adaptive_rate, mutate};
pub use selection::SelectionMethod;
