use std::time::{Duration, Instant};

use crate::game::GameSnapshot;

/// How one game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub score: u32,
    pub level: u32,
    pub length: usize,
    pub ticks: u64,
    pub duration: Duration,
}

/// Results of every game played in one terminal session.
///
/// The clock runs from the start of the current game and stops when that
/// game is recorded.
#[derive(Debug, Clone)]
pub struct SessionStats {
    started: Instant,
    stopped: Option<Duration>,
    records: Vec<GameRecord>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
            records: Vec::new(),
        }
    }

    /// Restart the clock for a fresh game
    pub fn start_game(&mut self) {
        self.started = Instant::now();
        self.stopped = None;
    }

    /// Record the final snapshot of the current game and stop the clock.
    ///
    /// Returns `None` if this game was already recorded.
    pub fn finish_game(&mut self, last: &GameSnapshot) -> Option<&GameRecord> {
        if self.stopped.is_some() {
            return None;
        }

        let duration = self.started.elapsed();
        self.stopped = Some(duration);
        self.records.push(GameRecord {
            score: last.score,
            level: last.level,
            length: last.body.len(),
            ticks: last.tick,
            duration,
        });
        self.records.last()
    }

    /// Time spent in the current game
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }

    pub fn clock(&self) -> String {
        format_clock(self.elapsed())
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn games_played(&self) -> usize {
        self.records.len()
    }

    pub fn best_score(&self) -> u32 {
        self.records.iter().map(|r| r.score).max().unwrap_or(0)
    }

    pub fn best_level(&self) -> u32 {
        self.records.iter().map(|r| r.level).max().unwrap_or(0)
    }

    pub fn longest_snake(&self) -> usize {
        self.records.iter().map(|r| r.length).max().unwrap_or(0)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// `MM:SS`; minutes keep counting past the hour
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
