//! Torus Snake - the classic snake game on a wrap-around grid
//!
//! This library provides:
//! - Core game rules (game module)
//! - Keyboard mapping and intent buffering (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - Interactive and headless replay runners (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

pub use error::{ConfigError, ScriptError, SelfCollision};
