//! Decision engine: the heritable brain, the evaluators that read it and the
//! lookahead search that turns evaluations into a move.

pub mod config;
pub mod evaluator;
pub mod features;
pub mod genome;
pub mod persistence;
pub mod presets;
pub mod search;

pub use config::SearchConfig;
pub use evaluator::{
    Evaluator, EvaluatorKind, FeedForward, LinearHeuristic, LINEAR_GENOME_LEN, LINEAR_LABELS,
    NETWORK_GENOME_LEN,
};
pub use features::CandidateFeatures;
pub use genome::Brain;
pub use persistence::{load_brain, save_brain};
pub use presets::{find_preset, Preset, PRESETS};
pub use search::{LookaheadSearch, SearchContext};
