//! Keyboard handling for the terminal shell

pub mod handler;
pub mod intent;

pub use handler::{InputHandler, KeyAction};
pub use intent::IntentBuffer;
