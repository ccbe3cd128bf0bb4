use serde::{Deserialize, Serialize};

/// Which fitness formula ranks agents for selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessFormula {
    /// `score * length * 5 + survival * 10 - moves / (score + 1) + score^1.5 * 2`
    Baseline,
    /// Weighted sum of clamped components, scaled by 1000 and floored at 1.0
    Normalized,
}

/// Snapshot of the agent state a fitness formula reads
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessInputs {
    pub score: f64,
    pub length: usize,
    pub moves_made: u64,
    pub foods_eaten: u64,
    /// Simulated seconds alive
    pub elapsed: f64,
    /// Simulated seconds since the last meal
    pub idle: f64,
    pub starvation_seconds: f64,
    /// Sum of loop penalties incurred so far
    pub loop_penalty: f64,
}

const NORMALIZED_WEIGHTS: [f64; 5] = [0.25, 0.30, 0.20, 0.15, 0.10];
const SURVIVAL_HORIZON: f64 = 60.0;
const IDLE_PENALTY: f64 = 0.1;

impl FitnessFormula {
    pub fn evaluate(&self, inputs: &FitnessInputs) -> f64 {
        match self {
            FitnessFormula::Baseline => baseline(inputs),
            FitnessFormula::Normalized => normalized(inputs),
        }
    }
}

fn baseline(i: &FitnessInputs) -> f64 {
    let score = i.score.max(0.0);
    score * i.length as f64 * 5.0 + i.elapsed * 10.0 - i.moves_made as f64 / (score + 1.0)
        + score.powf(1.5) * 2.0
        - i.loop_penalty
}

fn normalized(i: &FitnessInputs) -> f64 {
    let foods = i.foods_eaten as f64;
    let moves = i.moves_made as f64;

    let survival = unit(i.elapsed / SURVIVAL_HORIZON);
    let food_efficiency = unit(foods * 20.0 / moves.max(1.0));
    let length = unit(i.length as f64 / 100.0);
    let movement = unit(1.0 - moves / (foods * 50.0 + 100.0));
    let streak = unit(foods.powf(0.8) / 50.0);

    let idle_penalty = if i.starvation_seconds > 0.0 {
        IDLE_PENALTY * unit(i.idle / i.starvation_seconds)
    } else {
        0.0
    };

    let components = [survival, food_efficiency, length, movement, streak];
    let weighted: f64 = components
        .iter()
        .zip(NORMALIZED_WEIGHTS.iter())
        .map(|(c, w)| c * w)
        .sum();

    (1000.0 * (weighted - idle_penalty) - i.loop_penalty).max(1.0)
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
