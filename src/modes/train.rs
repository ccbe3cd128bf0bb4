//! Headless training mode
//!
//! Runs a [`TrainingSession`] for a fixed number of generations, appends every
//! generation to the text log and saves the fittest brain at the end.
//!
//! # Example
//!
//! ```rust,no_run
//! use ga_snake::modes::{TrainConfig, TrainMode};
//! use ga_snake::session::SessionConfig;
//! use std::path::PathBuf;
//!
//! let mut config = TrainConfig::new(SessionConfig::default());
//! config.save_path = Some(PathBuf::from("models/best_brain.json"));
//!
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::brain::save_brain;
use crate::metrics::{GenerationLog, DEFAULT_LOG_FILE};
use crate::session::{SessionConfig, TrainingSession};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub session: SessionConfig,

    /// Append-only generation log, skipped when `None`
    pub log_path: Option<PathBuf>,

    /// Where the best brain is written at the end
    pub save_path: Option<PathBuf>,

    /// Log rolling statistics every N generations
    pub log_frequency: usize,
}

impl TrainConfig {
    pub fn new(session: SessionConfig) -> Self {
        Self {
            session,
            log_path: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            save_path: None,
            log_frequency: 10,
        }
    }
}

/// Outcome of a finished training run
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub generations: usize,
    pub best_fitness: f64,
    pub best_length: usize,
    pub best_score: f64,
    pub converged: bool,
}

pub struct TrainMode {
    session: TrainingSession,
    log: Option<GenerationLog<File>>,
    config: TrainConfig,
}

impl TrainMode {
    pub fn new(config: TrainConfig) -> Result<Self> {
        let session =
            TrainingSession::new(config.session.clone()).context("Failed to start training session")?;
        let log = config
            .log_path
            .as_deref()
            .map(GenerationLog::append_to)
            .transpose()?;

        Ok(Self {
            session,
            log,
            config,
        })
    }

    /// Run the training loop
    ///
    /// The last generation is scored and logged but not bred.
    pub fn run(&mut self) -> Result<TrainReport> {
        self.print_header();

        let generations = self.config.session.generations;
        for g in 0..generations {
            let summary = self.session.run_generation();

            let breeding = if g + 1 < generations {
                Some(self.session.evolve().context("Failed to evolve population")?)
            } else {
                None
            };

            if let Some(log) = self.log.as_mut() {
                log.record(&summary, breeding.as_ref())
                    .context("Failed to append to generation log")?;
            }

            if (g + 1) % self.config.log_frequency.max(1) == 0 {
                info!(
                    "[Generation {}/{}] {}",
                    g + 1,
                    generations,
                    self.session.stats().format_summary()
                );
            }
        }

        self.save_best()?;

        let stats = self.session.stats();
        let report = TrainReport {
            generations: stats.total_generations(),
            best_fitness: stats.best_ever_fitness(),
            best_length: stats.best_ever_length(),
            best_score: stats.best_ever_score(),
            converged: self.session.is_converged(),
        };

        info!(
            generations = report.generations,
            best_fitness = report.best_fitness,
            best_length = report.best_length,
            best_score = report.best_score,
            converged = report.converged,
            "training complete"
        );

        Ok(report)
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    fn save_best(&self) -> Result<()> {
        let (Some(path), Some(best)) = (&self.config.save_path, self.session.best_ever()) else {
            return Ok(());
        };
        save_brain(&best.brain, path)
            .with_context(|| format!("Failed to save best brain to {:?}", path))?;
        info!(path = ?path, fitness = best.fitness, "best brain saved");
        Ok(())
    }

    fn print_header(&self) {
        let config = &self.config.session;
        info!(
            generations = config.generations,
            population = config.population_size,
            evaluator = config.evaluator.name(),
            grid = %format!("{}x{}", config.game.grid_width, config.game.grid_height),
            fitness = ?config.game.fitness,
            elitism = ?config.evolution.elitism,
            seed = ?config.seed,
            "starting training"
        );
    }
}
