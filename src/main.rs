use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use ga_snake::brain::{EvaluatorKind, PRESETS};
use ga_snake::modes::{BrainSource, PresetConfig, PresetMode, TrainConfig, TrainMode};
use ga_snake::session::SessionConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ga_snake")]
#[command(version, about = "Snake agents evolved with a genetic algorithm")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// JSON session config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Agents per generation
    #[arg(long)]
    population: Option<usize>,

    /// Generations to train
    #[arg(long)]
    generations: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Move evaluator
    #[arg(long)]
    evaluator: Option<Evaluator>,

    /// Append-only generation log
    #[arg(long, default_value = "training_log.txt")]
    log_file: PathBuf,

    /// Skip writing the generation log
    #[arg(long)]
    no_log: bool,

    /// Save the best brain here after training
    #[arg(long)]
    save: Option<PathBuf>,

    /// Preset to play in preset mode
    #[arg(long, default_value = "AI Mastery")]
    preset: String,

    /// Brain file to play in preset mode, instead of a preset
    #[arg(long)]
    brain: Option<PathBuf>,

    /// Demonstration runs in preset mode
    #[arg(long, default_value = "1")]
    runs: usize,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Evolve a population headlessly
    Train,
    /// Play a fixed preset or saved brain
    Preset,
    /// Print the built-in presets
    ListPresets,
}

#[derive(Clone, Copy, ValueEnum)]
enum Evaluator {
    Linear,
    Network,
}

impl From<Evaluator> for EvaluatorKind {
    fn from(evaluator: Evaluator) -> Self {
        match evaluator {
            Evaluator::Linear => EvaluatorKind::Linear,
            Evaluator::Network => EvaluatorKind::Network,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut session = match &cli.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(population) = cli.population {
        session.population_size = population;
    }
    if let Some(generations) = cli.generations {
        session.generations = generations;
    }
    if let Some(seed) = cli.seed {
        session.seed = Some(seed);
    }
    if let Some(evaluator) = cli.evaluator {
        session.evaluator = evaluator.into();
    }

    match cli.mode {
        Mode::Train => {
            let config = TrainConfig {
                log_path: (!cli.no_log).then(|| cli.log_file.clone()),
                save_path: cli.save.clone(),
                ..TrainConfig::new(session)
            };
            let report = TrainMode::new(config)?.run()?;
            println!(
                "Best fitness {:.2} | best length {} | best score {:.1} | {} generations{}",
                report.best_fitness,
                report.best_length,
                report.best_score,
                report.generations,
                if report.converged { " (converged)" } else { "" }
            );
        }
        Mode::Preset => {
            let source = match &cli.brain {
                Some(path) => BrainSource::File(path.clone()),
                None => BrainSource::Preset(cli.preset.clone()),
            };
            let config = PresetConfig {
                evaluator: session.evaluator,
                game: session.game,
                search: session.search,
                runs: cli.runs,
                seed: session.seed,
                ..PresetConfig::new(source)
            };
            let mut mode = PresetMode::new(config)?;
            for (i, result) in mode.run()?.iter().enumerate() {
                println!(
                    "{} run {}: score {:.1}, length {}, {} ticks, {}",
                    mode.name(),
                    i + 1,
                    result.score,
                    result.length,
                    result.ticks,
                    match result.death {
                        Some(cause) => format!("died ({:?})", cause),
                        None => "time limit".to_string(),
                    }
                );
            }
        }
        Mode::ListPresets => {
            for preset in PRESETS.iter() {
                println!("{:<12} {}", preset.name, preset.description);
            }
        }
    }

    info!("done");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
