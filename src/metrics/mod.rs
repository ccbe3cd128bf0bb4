pub mod generation_log;
pub mod training_stats;

pub use generation_log::{GenerationLog, DEFAULT_LOG_FILE};
pub use training_stats::{GenerationSummary, TrainingStats};
