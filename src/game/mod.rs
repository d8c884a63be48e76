//! Core game logic module for Snake
//!
//! Pure game rules with no I/O or rendering: a snake on a wrap-around grid,
//! food placement, score and level progression. Driven one tick at a time by
//! whatever front end owns the clock.

pub mod config;
pub mod direction;
pub mod food;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, MAX_GRID_SIDE};
pub use direction::Direction;
pub use food::Food;
pub use grid::{Cell, Grid};
pub use snake::Snake;
pub use state::{GameSnapshot, GameState, Phase, TickResult};
