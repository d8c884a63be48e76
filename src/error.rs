//! Error types for the game core

use thiserror::Error;

use crate::game::{Cell, Direction};

/// Reasons a `GameConfig` cannot start a game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid must be at least 2x2 cells, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },

    #[error("Grid sides are limited to {max} cells, got {width}x{height}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("Initial snake length must be at least 1")]
    EmptySnake,

    #[error("Start head {0:?} lies outside the grid")]
    HeadOutOfBounds(Cell),

    #[error("A snake of length {length} facing {direction:?} does not fit on a {extent}-cell axis")]
    SnakeDoesNotFit {
        length: usize,
        direction: Direction,
        extent: usize,
    },

    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    #[error("No free cell left to place food")]
    NoRoomForFood,
}

/// The snake's next head would land on its own body
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Snake ran into itself at {at:?}")]
pub struct SelfCollision {
    pub at: Cell,
}

/// A replay script contained something other than a move symbol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Unknown script symbol '{symbol}' at position {position} (expected U, D, L, R or .)")]
    UnknownSymbol { symbol: char, position: usize },
}
