/// Raw observations about one candidate move, shared by every evaluator
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFeatures {
    /// Recursion level the candidate was generated at (0 = next move)
    pub depth: usize,
    /// Reward for landing on food, zero otherwise
    pub food_reward: f64,
    /// Manhattan distance from the candidate to the food, in cells
    pub food_distance: i32,
    /// Food position minus candidate position
    pub food_delta: (i32, i32),
    /// Times the agent already entered this cell
    pub visit_count: usize,
    /// Candidate hugs a wall and the exception for wall-side food does not apply
    pub wall_hazard: bool,
    /// Cells to the nearest wall along x and y
    pub wall_distance: (i32, i32),
    /// Unique-cell ratio of the history with exponential decay
    pub exploration: f64,
    /// Candidate continues a run of identical moves
    pub momentum: bool,
    /// Onward neighbours occupied by the body
    pub blocked_onward: usize,
    /// Onward neighbours that are neither body nor wall
    pub safe_onward: usize,
    /// Current snake length
    pub length: usize,
    /// Playable width and height
    pub grid_span: (usize, usize),
}

impl CandidateFeatures {
    /// The eight normalised inputs fed to the network evaluator
    pub fn network_inputs(&self) -> [f64; 8] {
        let (w, h) = (self.grid_span.0.max(1) as f64, self.grid_span.1.max(1) as f64);
        let (dx, dy) = (self.food_delta.0 as f64, self.food_delta.1 as f64);
        let norm = (dx * dx + dy * dy).sqrt();
        let (dir_x, dir_y) = if norm > 0.0 {
            (dx / norm, dy / norm)
        } else {
            (0.0, 0.0)
        };

        [
            self.food_distance as f64 / (w + h),
            (self.length as f64 / 100.0).min(1.0),
            dir_x,
            dir_y,
            self.wall_distance.0 as f64 / (w / 2.0),
            self.wall_distance.1 as f64 / (h / 2.0),
            (self.visit_count as f64 / 10.0).min(1.0),
            self.safe_onward as f64 / 4.0,
        ]
    }
}
