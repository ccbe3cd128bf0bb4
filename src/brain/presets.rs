use super::genome::Brain;

/// A fixed, hand-tuned brain for demonstration play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub weights: [f64; 9],
}

impl Preset {
    pub fn brain(&self) -> Brain {
        Brain::new(self.weights.to_vec())
    }
}

pub const PRESETS: [Preset; 5] = [
    Preset {
        name: "Hunter",
        description: "Moves aggressively toward food.",
        weights: [4.583, 1.024, -0.472, 0.315, -2.127, -1.038, 1.143, -1.476, -1.018],
    },
    Preset {
        name: "Strategist",
        description: "Balances food collection with long-term survival.",
        weights: [3.472, 0.832, -0.754, 0.206, -2.473, -0.482, 0.583, -1.219, -1.452],
    },
    Preset {
        name: "Explorer",
        description: "Mix of exploration and food-seeking.",
        weights: [2.765, 0.746, -0.621, 0.381, -1.825, -0.752, 1.493, -0.975, -1.189],
    },
    Preset {
        name: "Risk Taker",
        description: "Adapts risky strategies for short period of time.",
        weights: [5.218, 1.217, -0.347, 0.089, -0.493, -2.013, -0.472, -1.839, -2.047],
    },
    Preset {
        name: "AI Mastery",
        description: "Advanced AI with optimized weights.",
        weights: [4.590, 0.791, 5.276, -0.006, -2.184, -3.037, 2.219, -1.856, -0.787],
    },
];

/// Look up a preset by name, ignoring case and treating `-`/`_` as spaces
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let wanted = normalize(name);
    PRESETS.iter().find(|p| normalize(p.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_presets() {
        assert_eq!(PRESETS.len(), 5);
        assert!(PRESETS.iter().all(|p| p.brain().len() == 9));
    }

    #[test]
    fn test_find_preset_is_lenient() {
        assert_eq!(find_preset("hunter").map(|p| p.name), Some("Hunter"));
        assert_eq!(find_preset("risk-taker").map(|p| p.name), Some("Risk Taker"));
        assert_eq!(find_preset(" AI_Mastery ").map(|p| p.name), Some("AI Mastery"));
        assert!(find_preset("nobody").is_none());
    }
}
