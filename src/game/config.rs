use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::Cell;
use crate::error::ConfigError;

/// Largest grid side; keeps cell coordinates in `i32` and the board in a `u16` terminal width
pub const MAX_GRID_SIDE: usize = 4096;

/// Configuration for one game session.
///
/// Immutable once a `GameState` is built from it. Missing fields in a JSON
/// file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,

    /// Head of the snake at the start of a game
    pub start_head: Cell,
    /// Direction the snake faces at the start; the body trails behind it
    pub start_direction: Direction,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Points for each food eaten
    pub food_reward: u32,
    /// A level is gained each time the score passes a multiple of this
    pub level_threshold: u32,
    pub initial_level: u32,
    /// Ticks per second at the first level
    pub initial_speed: u32,
    /// Ticks per second added on each level-up
    pub speed_increment: u32,

    /// Seed for food placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 24,
            start_head: Cell::new(5, 5),
            start_direction: Direction::Right,
            initial_snake_length: 3,
            food_reward: 10,
            level_threshold: 100,
            initial_level: 1,
            initial_speed: 10,
            speed_increment: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Same configuration with a fixed food seed
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a (possibly partial) configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Check that a game can start with this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_GRID_SIDE,
            });
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        let head = self.start_head;
        if head.x < 0
            || head.y < 0
            || head.x as usize >= self.grid_width
            || head.y as usize >= self.grid_height
        {
            return Err(ConfigError::HeadOutOfBounds(head));
        }

        // The body wraps behind the head, so it only has to fit along its axis
        let extent = match self.start_direction {
            Direction::Left | Direction::Right => self.grid_width,
            Direction::Up | Direction::Down => self.grid_height,
        };
        if self.initial_snake_length > extent {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_snake_length,
                direction: self.start_direction,
                extent,
            });
        }

        if self.food_reward == 0 {
            return Err(ConfigError::NonPositive("food_reward"));
        }
        if self.level_threshold == 0 {
            return Err(ConfigError::NonPositive("level_threshold"));
        }
        if self.initial_speed == 0 {
            return Err(ConfigError::NonPositive("initial_speed"));
        }

        Ok(())
    }
}
