//! Training session: owns the population and everything that outlives a
//! single generation.
//!
//! A generation moves through [`Phase::Running`] (agents ticked until all are
//! terminal), [`Phase::Scored`] (summary recorded) and [`Phase::Evolved`]
//! (next population bred), after which ticking starts the next one.

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::brain::{EvaluatorKind, SearchConfig};
use crate::error::{ConfigError, SessionError};
use crate::evolution::{evolve, BreedStats, ConvergenceDetector, EvolutionConfig, ScoredBrain};
use crate::game::{GameConfig, SnakeAgent, SnakeFactory, World};
use crate::metrics::{GenerationSummary, TrainingStats};

/// Everything needed to start a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub population_size: usize,
    /// Generations run by a training mode
    pub generations: usize,
    /// Fixed seed for a reproducible run; drawn from the OS when absent
    pub seed: Option<u64>,
    pub evaluator: EvaluatorKind,
    /// Force the generation to end after this many ticks
    pub max_ticks_per_generation: Option<u64>,
    /// Generations averaged by the rolling statistics
    pub stats_window: usize,
    pub game: GameConfig,
    pub search: SearchConfig,
    pub evolution: EvolutionConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            seed: None,
            evaluator: EvaluatorKind::Linear,
            max_ticks_per_generation: None,
            stats_window: 10,
            game: GameConfig::default(),
            search: SearchConfig::default(),
            evolution: EvolutionConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Read a JSON config; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session config from {:?}", path))?;
        let config: SessionConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse session config in {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::NotPositive {
                field: "population_size",
                value: 0.0,
            });
        }
        if self.stats_window == 0 {
            return Err(ConfigError::NotPositive {
                field: "stats_window",
                value: 0.0,
            });
        }
        if self.max_ticks_per_generation == Some(0) {
            return Err(ConfigError::NotPositive {
                field: "max_ticks_per_generation",
                value: 0.0,
            });
        }
        self.game.validate()?;
        self.search.validate()?;
        self.evolution.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Scored,
    Evolved,
}

pub struct TrainingSession {
    config: SessionConfig,
    factory: SnakeFactory,
    population: Vec<SnakeAgent>,
    phase: Phase,
    /// Index of the current generation
    generation: usize,
    /// Ticks simulated in the current generation
    ticks: u64,
    /// Best fitness of every scored generation, oldest first
    best_history: Vec<f64>,
    average_history: Vec<f64>,
    best_ever: Option<ScoredBrain>,
    last_summary: Option<GenerationSummary>,
    stats: TrainingStats,
    convergence: ConvergenceDetector,
    rng: SmallRng,
}

impl TrainingSession {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let world = World::new(config.game.clone(), config.search.clone());
        let factory = SnakeFactory::new(world, config.evaluator);
        let population = factory.create_population(config.population_size, &mut rng)?;

        info!(
            population = config.population_size,
            evaluator = config.evaluator.name(),
            grid_width = config.game.grid_width,
            grid_height = config.game.grid_height,
            "training session created"
        );

        Ok(Self {
            stats: TrainingStats::new(config.stats_window),
            convergence: ConvergenceDetector::new(&config.evolution),
            config,
            factory,
            population,
            phase: Phase::Running,
            generation: 0,
            ticks: 0,
            best_history: Vec::new(),
            average_history: Vec::new(),
            best_ever: None,
            last_summary: None,
            rng,
        })
    }

    /// Advance every alive agent by one tick. Returns the number still alive.
    ///
    /// Only agents of a running generation move; a scored generation must be
    /// evolved first.
    pub fn tick(&mut self) -> usize {
        match self.phase {
            Phase::Scored => return 0,
            Phase::Evolved => self.phase = Phase::Running,
            Phase::Running => {}
        }

        #[cfg(feature = "parallel")]
        self.population.par_iter_mut().for_each(|agent| {
            agent.step();
        });
        #[cfg(not(feature = "parallel"))]
        for agent in self.population.iter_mut() {
            agent.step();
        }

        self.ticks += 1;
        self.alive_count()
    }

    /// No agent is alive, or the tick cap was hit
    pub fn is_generation_over(&self) -> bool {
        self.alive_count() == 0
            || self
                .config
                .max_ticks_per_generation
                .map_or(false, |cap| self.ticks >= cap)
    }

    /// Simulate the current generation to the end and score it
    pub fn run_generation(&mut self) -> GenerationSummary {
        while self.phase != Phase::Scored && !self.is_generation_over() {
            self.tick();
        }
        self.score()
    }

    /// Record the current generation's outcome.
    ///
    /// Histories grow once per generation; scoring an already scored
    /// generation returns the recorded summary.
    pub fn score(&mut self) -> GenerationSummary {
        if self.phase == Phase::Scored {
            if let Some(summary) = &self.last_summary {
                return summary.clone();
            }
        }

        let mut summary =
            GenerationSummary::from_population(self.generation, &self.population, self.ticks);
        summary.converged = self
            .convergence
            .record(summary.best_fitness, summary.average_fitness);

        self.stats.record_summary(&summary);
        self.best_history.push(summary.best_fitness);
        self.average_history.push(summary.average_fitness);

        let improved = self
            .best_ever
            .as_ref()
            .map_or(true, |best| summary.best_fitness > best.fitness);
        if improved && !summary.best_brain.is_empty() {
            self.best_ever = Some(ScoredBrain {
                brain: summary.best_brain.clone(),
                fitness: summary.best_fitness,
            });
        }

        info!(
            generation = self.generation + 1,
            best_fitness = summary.best_fitness,
            average_fitness = summary.average_fitness,
            best_length = summary.best_length,
            ticks = summary.ticks,
            diversity = summary.diversity,
            converged = summary.converged,
            "generation finished"
        );

        self.phase = Phase::Scored;
        self.last_summary = Some(summary.clone());
        summary
    }

    /// Replace the population with the next generation.
    ///
    /// A generation that was never scored is scored first.
    pub fn evolve(&mut self) -> Result<BreedStats, SessionError> {
        if self.phase != Phase::Scored {
            self.score();
        }

        let next = evolve(
            &self.population,
            &self.best_history,
            &self.factory,
            &self.config.evolution,
            &mut self.rng,
        )?;

        debug!(
            generation = self.generation + 1,
            mutation_rate = next.stats.mutation_rate,
            "population evolved"
        );

        self.population = next.agents;
        self.generation += 1;
        self.ticks = 0;
        self.phase = Phase::Evolved;
        Ok(next.stats)
    }

    /// Get the number of agents still alive
    pub fn alive_count(&self) -> usize {
        self.population.iter().filter(|a| a.alive).count()
    }

    /// Get the current population
    pub fn population(&self) -> &[SnakeAgent] {
        &self.population
    }

    /// Get where the current generation is in its lifecycle
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the zero-based generation index
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Get the ticks simulated in the current generation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get the best fitness of every scored generation
    pub fn best_history(&self) -> &[f64] {
        &self.best_history
    }

    /// Get the average fitness of every scored generation
    pub fn average_history(&self) -> &[f64] {
        &self.average_history
    }

    /// Fittest brain seen so far across all generations
    pub fn best_ever(&self) -> Option<&ScoredBrain> {
        self.best_ever.as_ref()
    }

    /// Get the rolling training statistics
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Check whether fitness has stopped improving
    pub fn is_converged(&self) -> bool {
        self.convergence.is_converged()
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the factory that builds agents for this session
    pub fn factory(&self) -> &SnakeFactory {
        &self.factory
    }
}
