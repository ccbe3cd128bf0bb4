use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    history::MoveHistory,
    state::{CellKind, Grid, Position, Snake},
};
use crate::brain::{Brain, Evaluator, EvaluatorKind, LookaheadSearch, SearchConfig, SearchContext};
use crate::error::GameError;
use crate::evolution::FitnessInputs;

/// Board, rules and search settings shared read-only by a population
#[derive(Debug, Clone)]
pub struct World {
    pub grid: Grid,
    pub game: GameConfig,
    pub search: SearchConfig,
}

impl World {
    /// Board and rules shared by a population.
    ///
    /// Both configs are expected to have passed `validate`; a loop death
    /// probability outside [0, 1] panics on the first detected loop.
    pub fn new(game: GameConfig, search: SearchConfig) -> Self {
        Self {
            grid: Grid::from_config(&game),
            game,
            search,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameConfig::default(), SearchConfig::default())
    }
}

/// Who picks the next direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pilot {
    /// Lookahead search over the agent's brain
    Ai,
    /// Queued input; keeps the current heading when nothing is queued
    Manual { queued: Option<Direction> },
}

/// Why an agent stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    Starvation,
    Loop,
    BoardFull,
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Direction taken, `None` if the agent was already dead
    pub direction: Option<Direction>,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether the loop detector fired this step
    pub loop_detected: bool,
    /// Set when the agent died during this step
    pub death: Option<DeathCause>,
}

/// One member of the population, simulated on its own board.
///
/// Fields are public for display; mutate them only through [`SnakeAgent::step`]
/// outside of tests.
#[derive(Debug, Clone)]
pub struct SnakeAgent {
    pub snake: Snake,
    pub food: Position,
    pub alive: bool,
    pub score: f64,
    /// Food eaten; always `snake.len() - 1`
    pub length: usize,
    pub moves_made: u64,
    pub foods_eaten: u64,
    pub brain: Brain,
    pub evaluator: EvaluatorKind,
    pub history: MoveHistory,
    /// Simulated seconds since the agent was created
    pub clock: f64,
    pub last_food_time: f64,
    /// Sum of loop penalties incurred so far
    pub loop_penalty: f64,
    pub fitness: f64,
    pub death: Option<DeathCause>,
    pilot: Pilot,
    world: Arc<World>,
    rng: SmallRng,
}

impl SnakeAgent {
    /// Fresh agent at the centre of the board.
    ///
    /// A missing brain is drawn at random; a brain of the wrong length is
    /// zero-padded or truncated to what `evaluator` reads.
    pub fn new(
        world: Arc<World>,
        evaluator: EvaluatorKind,
        brain: Option<Brain>,
        seed: u64,
    ) -> Result<Self, GameError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let genome_len = evaluator.genome_len();
        let brain = match brain {
            Some(brain) => brain.fitted(genome_len),
            None => Brain::random(genome_len, &mut rng),
        };
        let snake = Snake::new(world.grid.center(), Direction::random(&mut rng));
        let food = spawn_food(
            &world.grid,
            &snake.body,
            world.game.max_spawn_attempts,
            &mut rng,
        )?;

        let mut agent = Self {
            snake,
            food,
            alive: true,
            score: 0.0,
            length: 0,
            moves_made: 0,
            foods_eaten: 0,
            brain,
            evaluator,
            history: MoveHistory::new(),
            clock: 0.0,
            last_food_time: 0.0,
            loop_penalty: 0.0,
            fitness: 0.0,
            death: None,
            pilot: Pilot::Ai,
            world,
            rng,
        };
        agent.fitness = agent.compute_fitness();
        Ok(agent)
    }

    /// Switch to queued manual input
    pub fn manual(mut self) -> Self {
        self.pilot = Pilot::Manual { queued: None };
        self
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn body(&self) -> &[Position] {
        &self.snake.body
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Simulated seconds alive
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    /// Queue input for a manual pilot. Reversing the current heading is ignored.
    pub fn steer(&mut self, action: Action) {
        let current = self.snake.direction;
        if let Pilot::Manual { queued } = &mut self.pilot {
            match action {
                Action::Move(direction) if !current.is_opposite(direction) => {
                    *queued = Some(direction);
                }
                Action::Move(_) | Action::Continue => {}
            }
        }
    }

    /// Direction the decision engine would pick now
    pub fn choose_direction(&mut self) -> Direction {
        let ctx = SearchContext {
            grid: &self.world.grid,
            body: &self.snake.body,
            food: self.food,
            history: &self.history,
            length: self.length,
        };
        LookaheadSearch::new(&self.world.search, &self.evaluator, &self.brain, ctx)
            .choose_direction(&mut self.rng)
    }

    /// Advance one tick. No-op once dead.
    pub fn step(&mut self) -> StepInfo {
        if !self.alive {
            return StepInfo::default();
        }

        self.clock += self.world.game.tick_seconds;

        let direction = self.next_direction();
        self.snake.direction = direction;
        let new_head = self.snake.head().moved_in_direction(direction);

        let mut info = StepInfo {
            direction: Some(direction),
            ..Default::default()
        };

        match self.world.grid.classify(new_head, &self.snake.body, self.food) {
            CellKind::Wall => {
                self.kill(DeathCause::Wall);
                info.death = self.death;
                return info;
            }
            CellKind::SelfCollision => {
                self.kill(DeathCause::SelfCollision);
                info.death = self.death;
                return info;
            }
            CellKind::Free | CellKind::Food => {}
        }

        let ate_food = new_head == self.food;
        self.snake.advance(new_head, ate_food);
        self.history.record(new_head, direction);
        self.moves_made += 1;

        // Starvation marks the agent dead but the rest of the tick still counts
        if self.is_starving() {
            self.kill(DeathCause::Starvation);
        }

        if self.detect_loop() {
            info.loop_detected = true;
            self.loop_penalty += self.world.game.loop_penalty;
            trace!(moves = self.moves_made, "loop detected");
            if self.rng.gen_bool(self.world.game.loop_death_probability) {
                self.kill(DeathCause::Loop);
            }
        }

        if ate_food {
            info.ate_food = true;
            self.score += self.world.game.food_bonus;
            self.length += 1;
            self.foods_eaten += 1;
            self.last_food_time = self.clock;
            match spawn_food(
                &self.world.grid,
                &self.snake.body,
                self.world.game.max_spawn_attempts,
                &mut self.rng,
            ) {
                Ok(food) => self.food = food,
                Err(err) => {
                    warn!(%err, length = self.length, "no room left for food");
                    self.kill(DeathCause::BoardFull);
                }
            }
        }

        self.score += self.world.game.survival_base
            + self.world.game.survival_per_length * self.length as f64;
        self.fitness = self.compute_fitness();

        info.death = if self.alive { None } else { self.death };
        info
    }

    /// Whether recent positions repeat often enough to count as a loop
    pub fn detect_loop(&self) -> bool {
        let game = &self.world.game;
        let window = game.loop_window.max(2 * self.length);
        let threshold = if self.length < game.loop_long_length {
            game.loop_threshold_short
        } else {
            game.loop_threshold_long
        };
        self.history
            .max_repeats(window)
            .map_or(false, |repeats| repeats >= threshold)
    }

    pub fn is_starving(&self) -> bool {
        let game = &self.world.game;
        self.length < game.starvation_immune_length
            && self.clock - self.last_food_time > game.starvation_seconds
    }

    pub fn fitness_inputs(&self) -> FitnessInputs {
        FitnessInputs {
            score: self.score,
            length: self.length,
            moves_made: self.moves_made,
            foods_eaten: self.foods_eaten,
            elapsed: self.clock,
            idle: self.clock - self.last_food_time,
            starvation_seconds: self.world.game.starvation_seconds,
            loop_penalty: self.loop_penalty,
        }
    }

    pub fn compute_fitness(&self) -> f64 {
        self.world.game.fitness.evaluate(&self.fitness_inputs())
    }

    fn next_direction(&mut self) -> Direction {
        if let Pilot::Manual { queued } = &mut self.pilot {
            return queued.take().unwrap_or(self.snake.direction);
        }
        self.choose_direction()
    }

    fn kill(&mut self, cause: DeathCause) {
        if self.alive {
            debug!(?cause, score = self.score, length = self.length, "agent died");
            self.alive = false;
            self.death = Some(cause);
        }
    }
}

/// Pick a random free cell for food.
///
/// Falls back to a row-major scan after `max_attempts` misses and fails only
/// when the body covers the whole board.
pub fn spawn_food<R: Rng + ?Sized>(
    grid: &Grid,
    body: &[Position],
    max_attempts: usize,
    rng: &mut R,
) -> Result<Position, GameError> {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    for _ in 0..max_attempts {
        let pos = Position::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if !body.contains(&pos) && !grid.is_wall(pos) {
            return Ok(pos);
        }
    }

    warn!(attempts = max_attempts, "food spawn falling back to board scan");
    grid.cells()
        .find(|pos| !body.contains(pos))
        .ok_or(GameError::BoardFull {
            width: grid.width(),
            height: grid.height(),
        })
}

/// Builds agents that share one [`World`]
#[derive(Debug, Clone)]
pub struct SnakeFactory {
    world: Arc<World>,
    evaluator: EvaluatorKind,
}

impl SnakeFactory {
    pub fn new(world: World, evaluator: EvaluatorKind) -> Self {
        Self {
            world: Arc::new(world),
            evaluator,
        }
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn evaluator(&self) -> EvaluatorKind {
        self.evaluator
    }

    /// Random brain when `brain` is `None`
    pub fn create_agent<R: Rng + ?Sized>(
        &self,
        brain: Option<Brain>,
        rng: &mut R,
    ) -> Result<SnakeAgent, GameError> {
        SnakeAgent::new(Arc::clone(&self.world), self.evaluator, brain, rng.gen())
    }

    pub fn create_population<R: Rng + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<SnakeAgent>, GameError> {
        (0..size).map(|_| self.create_agent(None, rng)).collect()
    }
}
