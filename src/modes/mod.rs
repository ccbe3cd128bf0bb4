pub mod preset;
pub mod train;

pub use preset::{BrainSource, PlayResult, PresetConfig, PresetMode};
pub use train::{TrainConfig, TrainMode, TrainReport};
