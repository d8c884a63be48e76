//! Headless replay of a scripted game
//!
//! Runs the game without a terminal: one tick per script symbol, one JSON
//! snapshot per line. With the same seed and script the output is
//! byte-for-byte identical, which makes it usable as a regression trace.

use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::error::ScriptError;
use crate::game::{Direction, GameConfig, GameSnapshot, GameState, TickResult};

/// Seed used when the configuration does not pin one
pub const DEFAULT_REPLAY_SEED: u64 = 0;

/// Parse a script of `U`/`D`/`L`/`R` (turn) and `.` (no intent).
///
/// Whitespace is ignored so long scripts can be wrapped.
pub fn parse_script(script: &str) -> Result<Vec<Option<Direction>>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_whitespace())
        .map(|(position, symbol)| match symbol {
            '.' => Ok(None),
            _ => Direction::from_symbol(symbol)
                .map(Some)
                .ok_or(ScriptError::UnknownSymbol { symbol, position }),
        })
        .collect()
}

pub struct ReplayMode {
    config: GameConfig,
    intents: Vec<Option<Direction>>,
}

impl ReplayMode {
    pub fn new(config: GameConfig, script: &str) -> Result<Self> {
        let intents = parse_script(script).context("Invalid replay script")?;
        let config = GameConfig {
            seed: Some(config.seed.unwrap_or(DEFAULT_REPLAY_SEED)),
            ..config
        };

        Ok(Self { config, intents })
    }

    /// Play the script, writing the initial snapshot and one per tick.
    ///
    /// Stops early on game over. Returns the last snapshot.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<GameSnapshot> {
        let mut state =
            GameState::new(self.config.clone()).context("Invalid game configuration")?;
        write_snapshot(out, &state.snapshot())?;

        for intent in &self.intents {
            let result = state.tick(*intent);
            write_snapshot(out, &state.snapshot())?;

            if result == TickResult::GameOver {
                break;
            }
        }

        out.flush().context("Failed to flush replay output")?;

        let last = state.snapshot();
        info!(
            ticks = last.tick,
            score = last.score,
            level = last.level,
            game_over = last.game_over,
            "Replay finished"
        );
        Ok(last)
    }
}

fn write_snapshot<W: Write>(out: &mut W, snapshot: &GameSnapshot) -> Result<()> {
    serde_json::to_writer(&mut *out, snapshot).context("Failed to serialize snapshot")?;
    writeln!(out).context("Failed to write snapshot")?;
    Ok(())
}
