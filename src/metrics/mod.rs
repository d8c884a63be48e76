pub mod session;

pub use session::{GameRecord, SessionStats};
