use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use super::config::GameConfig;
use super::direction::Direction;
use super::food::Food;
use super::grid::{Cell, Grid};
use super::snake::Snake;
use crate::error::ConfigError;

/// Floor for `tick_interval`; timers reject a zero period
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Running,
    /// Terminal: a new `GameState` is needed to play again
    GameOver,
}

/// Read-only view of everything a front end needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub body: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub level: u32,
    pub speed: u32,
    pub game_over: bool,
}

/// Complete game state.
///
/// Owns the snake, the food and the random source used to place food, so a
/// fixed seed and a fixed sequence of intents always replay the same game.
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Food,
    score: u32,
    level: u32,
    speed: u32,
    ticks: u64,
    phase: Phase,
    rng: R,
}

impl GameState<StdRng> {
    /// Start a game, seeding food placement from `config.seed` when set
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameState<R> {
    /// Start a game with an explicit random source
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Snake::new(
            config.start_head,
            config.start_direction,
            config.initial_snake_length,
            &grid,
        );
        // A validated body fills at most one row or column, so a free cell exists
        let food =
            Food::spawn(&grid, snake.occupied(), &mut rng).ok_or(ConfigError::NoRoomForFood)?;

        debug!(
            width = grid.width(),
            height = grid.height(),
            food = ?food.position(),
            "New game"
        );

        Ok(Self {
            grid,
            snake,
            food,
            score: 0,
            level: config.initial_level,
            speed: config.initial_speed,
            ticks: 0,
            phase: Phase::Running,
            rng,
            config,
        })
    }

    /// Advance the game by one step.
    ///
    /// Applies `intent` (ignored if it would reverse the snake), moves the
    /// snake, and handles eating. Once the game is over every further call is
    /// a no-op returning `TickResult::GameOver`.
    pub fn tick(&mut self, intent: Option<Direction>) -> TickResult {
        if self.phase == Phase::GameOver {
            return TickResult::GameOver;
        }

        if let Some(direction) = intent {
            self.snake.turn(direction);
        }

        self.ticks += 1;

        // Food is never on the body, so growing into it cannot collide
        let next = self.grid.step(self.snake.head(), self.snake.direction());
        let eating = next == self.food.position();
        if eating {
            self.snake.mark_growth();
        }

        if let Err(collision) = self.snake.advance(&self.grid) {
            self.phase = Phase::GameOver;
            info!(
                at = ?collision.at,
                score = self.score,
                level = self.level,
                ticks = self.ticks,
                "Game over"
            );
            return TickResult::GameOver;
        }

        if eating {
            self.eat();
        }

        TickResult::Continue
    }

    fn eat(&mut self) {
        self.food
            .relocate(&self.grid, self.snake.occupied(), &mut self.rng);

        let previous = self.score;
        self.score = self.score.saturating_add(self.config.food_reward);
        debug!(
            score = self.score,
            length = self.snake.len(),
            food = ?self.food.position(),
            "Food eaten"
        );

        let threshold = self.config.level_threshold;
        for _ in previous / threshold..self.score / threshold {
            self.level_up();
        }
    }

    /// One level up: faster ticks
    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
        self.speed = self.speed.saturating_add(self.config.speed_increment);
        info!(level = self.level, speed = self.speed, "Level up");
    }

    /// Put the food on a specific cell
    pub fn place_food(&mut self, cell: Cell) {
        self.food = Food::at(self.grid.wrap(cell));
    }
}

impl<R> GameState<R> {
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food.position()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Ticks per second
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Wall-clock time between ticks at the current speed, never below one millisecond
    pub fn tick_interval(&self) -> Duration {
        (Duration::from_secs(1) / self.speed.max(1)).max(MIN_TICK_INTERVAL)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tick: self.ticks,
            body: self.snake.body().collect(),
            food: self.food.position(),
            score: self.score,
            level: self.level,
            speed: self.speed,
            game_over: self.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> GameState {
        GameState::new(GameConfig::default().with_seed(seed)).unwrap()
    }

    /// Put food on the cell the snake enters next
    fn feed(state: &mut GameState) {
        let next = state
            .grid()
            .step(state.snake().head(), state.snake().direction());
        state.place_food(next);
    }

    #[test]
    fn test_initial_state() {
        let state = seeded(1);

        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.speed(), 10);
        assert_eq!(state.ticks(), 0);
        assert_eq!(
            state.snake().body().collect::<Vec<_>>(),
            vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]
        );
        assert!(!state.snake().occupies(state.food()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = GameState::new(GameConfig::new(1, 1));
        assert!(matches!(result, Err(ConfigError::GridTooSmall { .. })));
    }

    #[test]
    fn test_plain_tick_moves_snake() {
        let mut state = seeded(1);
        state.place_food(Cell::new(20, 20));

        assert_eq!(state.tick(None), TickResult::Continue);

        assert_eq!(
            state.snake().body().collect::<Vec<_>>(),
            vec![Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]
        );
        assert_eq!(state.score(), 0);
        assert_eq!(state.ticks(), 1);
        assert_eq!(state.food(), Cell::new(20, 20));
    }

    #[test]
    fn test_eating_food() {
        let mut state = seeded(1);
        state.place_food(Cell::new(6, 5));

        assert_eq!(state.tick(None), TickResult::Continue);

        assert_eq!(state.score(), 10);
        assert_eq!(
            state.snake().body().collect::<Vec<_>>(),
            vec![
                Cell::new(6, 5),
                Cell::new(5, 5),
                Cell::new(4, 5),
                Cell::new(3, 5)
            ]
        );
        assert_ne!(state.food(), Cell::new(6, 5));
        assert!(!state.snake().occupies(state.food()));
        assert!(!state.snake().has_pending_growth());
    }

    #[test]
    fn test_intent_applies_before_move() {
        let mut state = seeded(1);
        state.place_food(Cell::new(20, 20));

        state.tick(Some(Direction::Down));

        assert_eq!(state.snake().direction(), Direction::Down);
        assert_eq!(state.snake().head(), Cell::new(5, 6));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut state = seeded(1);
        state.place_food(Cell::new(20, 20));

        state.tick(Some(Direction::Left));

        assert_eq!(state.snake().direction(), Direction::Right);
        assert_eq!(state.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn test_score_reaching_100_levels_up() {
        let mut state = seeded(3);

        for eaten in 1..=9 {
            feed(&mut state);
            state.tick(None);
            assert_eq!(state.score(), eaten * 10);
            assert_eq!(state.level(), 1);
        }

        feed(&mut state);
        state.tick(None);

        assert_eq!(state.score(), 100);
        assert_eq!(state.level(), 2);
        assert_eq!(state.speed(), 13);
        assert_eq!(state.snake().len(), 13);
    }

    #[test]
    fn test_level_up_on_threshold_crossing() {
        let config = GameConfig {
            food_reward: 30,
            ..GameConfig::default().with_seed(5)
        };
        let mut state = GameState::new(config).unwrap();

        for _ in 0..3 {
            feed(&mut state);
            state.tick(None);
        }
        assert_eq!(state.score(), 90);
        assert_eq!(state.level(), 1);

        feed(&mut state);
        state.tick(None);
        assert_eq!(state.score(), 120);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_level_up() {
        let mut state = seeded(1);
        state.level_up();
        state.level_up();

        assert_eq!(state.level(), 3);
        assert_eq!(state.speed(), 16);
    }

    #[test]
    fn test_large_reward_saturates_score() {
        let half = u32::MAX / 2 + 1;
        let config = GameConfig {
            food_reward: half,
            level_threshold: half,
            ..GameConfig::default().with_seed(9)
        };
        let mut state = GameState::new(config).unwrap();

        feed(&mut state);
        assert_eq!(state.tick(None), TickResult::Continue);
        assert_eq!(state.score(), half);
        assert_eq!(state.level(), 2);

        feed(&mut state);
        assert_eq!(state.tick(None), TickResult::Continue);
        assert_eq!(state.score(), u32::MAX);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_level_up_saturates_speed() {
        let config = GameConfig {
            speed_increment: u32::MAX,
            ..GameConfig::default().with_seed(9)
        };
        let mut state = GameState::new(config).unwrap();

        state.level_up();
        state.level_up();

        assert_eq!(state.level(), 3);
        assert_eq!(state.speed(), u32::MAX);
        assert_eq!(state.tick_interval(), MIN_TICK_INTERVAL);
    }

    #[test]
    fn test_tick_interval_follows_speed() {
        let mut state = seeded(1);
        assert_eq!(state.tick_interval(), Duration::from_millis(100));

        state.level_up();
        assert_eq!(state.tick_interval(), Duration::from_secs(1) / 13);
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut state = seeded(1);
        state.snake = Snake::from_body(
            [
                Cell::new(5, 5),
                Cell::new(4, 5),
                Cell::new(3, 5),
                Cell::new(3, 4),
                Cell::new(4, 4),
                Cell::new(5, 4),
                Cell::new(6, 4),
            ],
            Direction::Right,
        )
        .unwrap();
        state.place_food(Cell::new(20, 20));
        let before = state.snake().clone();

        // Turning up runs into (5, 4)
        assert_eq!(state.tick(Some(Direction::Up)), TickResult::GameOver);

        assert!(state.is_game_over());
        assert_eq!(state.snake().body().collect::<Vec<_>>(), before.body().collect::<Vec<_>>());
        assert!(state.snapshot().game_over);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = seeded(1);
        state.phase = Phase::GameOver;
        let before = state.snapshot();

        assert_eq!(state.tick(Some(Direction::Up)), TickResult::GameOver);
        assert_eq!(state.tick(None), TickResult::GameOver);

        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut state = GameState::new(GameConfig::small().with_seed(11)).unwrap();

        for _ in 0..6 {
            feed(&mut state);
            assert_eq!(state.tick(None), TickResult::Continue);
            assert!(!state.snake().occupies(state.food()));
        }
        assert_eq!(state.snake().len(), 9);
    }

    #[test]
    fn test_snake_wraps_across_edge() {
        let mut state = seeded(1);
        state.place_food(Cell::new(0, 0));

        // (5,5) -> (31,5) after 26 moves, then wraps to (0,5)
        for _ in 0..27 {
            assert_eq!(state.tick(None), TickResult::Continue);
        }

        assert_eq!(state.snake().head(), Cell::new(0, 5));
    }

    #[test]
    fn test_deterministic_replay() {
        let intents = [
            None,
            Some(Direction::Down),
            None,
            Some(Direction::Left),
            Some(Direction::Up),
            None,
            Some(Direction::Right),
        ];

        let run = |seed: u64| {
            let mut state = seeded(seed);
            let mut snapshots = vec![state.snapshot()];
            for round in 0..40 {
                if round % 3 == 0 {
                    feed(&mut state);
                }
                state.tick(intents[round % intents.len()]);
                snapshots.push(state.snapshot());
            }
            snapshots
        };

        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_with_rng_uses_given_source() {
        let config = GameConfig::default();
        let a = GameState::with_rng(config.clone(), StdRng::seed_from_u64(4)).unwrap();
        let b = GameState::with_rng(config, StdRng::seed_from_u64(4)).unwrap();

        assert_eq!(a.food(), b.food());
    }
}
