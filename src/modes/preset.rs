//! Demonstration play with a fixed brain
//!
//! The brain comes from a named preset or a file saved by training; it never
//! evolves. Each run plays one agent until it dies or hits the tick cap.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;

use crate::brain::{find_preset, load_brain, Brain, EvaluatorKind, SearchConfig, PRESETS};
use crate::game::{DeathCause, GameConfig, SnakeFactory, World};

/// Where the demonstration brain comes from
#[derive(Debug, Clone, PartialEq)]
pub enum BrainSource {
    /// Preset looked up by name
    Preset(String),
    /// JSON array written by training
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct PresetConfig {
    pub source: BrainSource,
    pub evaluator: EvaluatorKind,
    pub game: GameConfig,
    pub search: SearchConfig,
    pub runs: usize,
    /// Simulated seconds after which a run is stopped
    pub max_seconds: f64,
    pub seed: Option<u64>,
}

impl PresetConfig {
    pub fn new(source: BrainSource) -> Self {
        Self {
            source,
            evaluator: EvaluatorKind::Linear,
            game: GameConfig::default(),
            search: SearchConfig::default(),
            runs: 1,
            max_seconds: 300.0,
            seed: None,
        }
    }
}

/// Result of one demonstration run
#[derive(Debug, Clone, PartialEq)]
pub struct PlayResult {
    pub score: f64,
    pub length: usize,
    pub ticks: u64,
    pub fitness: f64,
    /// `None` when the tick cap stopped the run
    pub death: Option<DeathCause>,
}

pub struct PresetMode {
    name: String,
    brain: Brain,
    factory: SnakeFactory,
    config: PresetConfig,
    rng: SmallRng,
}

impl PresetMode {
    pub fn new(config: PresetConfig) -> Result<Self> {
        config.game.validate().context("Invalid game configuration")?;
        config.search.validate().context("Invalid search configuration")?;

        let (name, brain) = match &config.source {
            BrainSource::Preset(name) => {
                let preset = find_preset(name).ok_or_else(|| {
                    let known: Vec<&str> = PRESETS.iter().map(|p| p.name).collect();
                    anyhow!("Unknown preset {:?}, expected one of {}", name, known.join(", "))
                })?;
                (preset.name.to_string(), preset.brain())
            }
            BrainSource::File(path) => (path.display().to_string(), load_brain(path)?),
        };

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let factory = SnakeFactory::new(
            World::new(config.game.clone(), config.search.clone()),
            config.evaluator,
        );

        Ok(Self {
            name,
            brain,
            factory,
            config,
            rng,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Play every configured run
    pub fn run(&mut self) -> Result<Vec<PlayResult>> {
        info!(
            brain = %self.name,
            evaluator = self.config.evaluator.name(),
            runs = self.config.runs,
            "starting demonstration"
        );

        (0..self.config.runs)
            .map(|run| -> Result<PlayResult> {
                let result = self.play_once()?;
                info!(
                    run = run + 1,
                    score = result.score,
                    length = result.length,
                    ticks = result.ticks,
                    death = ?result.death,
                    "run finished"
                );
                Ok(result)
            })
            .collect()
    }

    pub fn play_once(&mut self) -> Result<PlayResult> {
        let mut agent = self
            .factory
            .create_agent(Some(self.brain.clone()), &mut self.rng)
            .context("Failed to place demonstration agent")?;
        let max_ticks = self.config.game.ticks_for(self.config.max_seconds);

        let mut ticks = 0;
        while agent.alive && ticks < max_ticks {
            agent.step();
            ticks += 1;
        }

        Ok(PlayResult {
            score: agent.score,
            length: agent.length,
            ticks,
            fitness: agent.fitness,
            death: agent.death,
        })
    }
}
