//! Append-only, human-readable record of every generation

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::training_stats::GenerationSummary;
use crate::evolution::BreedStats;

pub const DEFAULT_LOG_FILE: &str = "training_log.txt";

/// Writes one text block per generation to any line-oriented sink
pub struct GenerationLog<W: Write> {
    writer: W,
}

impl GenerationLog<File> {
    /// Open `path` for appending, creating it and its parent directories
    pub fn append_to(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {:?}", parent)
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open generation log: {:?}", path))?;

        Ok(Self::new(file))
    }
}

impl<W: Write> GenerationLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Append the block for one generation.
    ///
    /// `breeding` describes how the following generation was built, if it was.
    pub fn record(
        &mut self,
        summary: &GenerationSummary,
        breeding: Option<&BreedStats>,
    ) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Generation {}", summary.generation + 1)?;
        writeln!(w, "  Best Fitness: {:.2}", summary.best_fitness)?;
        writeln!(w, "  Average Fitness: {:.2}", summary.average_fitness)?;
        writeln!(
            w,
            "  Best Length: {} (average {:.2})",
            summary.best_length, summary.average_length
        )?;
        writeln!(w, "  Best Score: {:.1}", summary.best_score)?;
        writeln!(w, "  Ticks: {}", summary.ticks)?;
        writeln!(w, "  Diversity: {:.4}", summary.diversity)?;
        if let Some(stats) = breeding {
            writeln!(w, "  Mutation Rate: {:.4}", stats.mutation_rate)?;
            writeln!(
                w,
                "  Elites: {} | Offspring: {} | Injected: {}",
                stats.elites, stats.offspring, stats.injected
            )?;
        }
        writeln!(
            w,
            "  Converged: {}",
            if summary.converged { "yes" } else { "no" }
        )?;
        writeln!(w, "  Inherited Weights ({}):", summary.evaluator.name())?;
        for (i, weight) in summary.best_brain.weights().iter().enumerate() {
            writeln!(w, "    {}: {:.4}", summary.evaluator.gene_label(i), weight)?;
        }
        writeln!(w)?;
        w.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{Brain, EvaluatorKind};
    use tempfile::TempDir;

    fn summary() -> GenerationSummary {
        GenerationSummary {
            generation: 2,
            best_fitness: 512.25,
            average_fitness: 120.5,
            best_score: 640.0,
            best_length: 7,
            average_length: 1.5,
            ticks: 1800,
            diversity: 0.75,
            converged: false,
            best_brain: Brain::new(vec![0.5; 9]),
            evaluator: EvaluatorKind::Linear,
        }
    }

    #[test]
    fn test_block_contents() {
        let mut log = GenerationLog::new(Vec::new());
        let stats = BreedStats {
            mutation_rate: 0.15,
            elites: 3,
            offspring: 17,
            ..Default::default()
        };
        log.record(&summary(), Some(&stats)).unwrap();

        let text = String::from_utf8(log.into_inner()).unwrap();
        assert!(text.starts_with("Generation 3\n"));
        assert!(text.contains("Best Fitness: 512.25"));
        assert!(text.contains("Best Length: 7"));
        assert!(text.contains("Mutation Rate: 0.1500"));
        assert!(text.contains("Food Bonus: 0.5000"));
        assert!(text.contains("Dead-End Penalty: 0.5000"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_appends_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("training_log.txt");

        GenerationLog::append_to(&path)
            .unwrap()
            .record(&summary(), None)
            .unwrap();
        GenerationLog::append_to(&path)
            .unwrap()
            .record(&summary(), None)
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("Generation 3").count(), 2);
        assert!(!text.contains("Mutation Rate"));
    }
}
