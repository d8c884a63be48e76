use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, interval, interval_at};
use tracing::{debug, info};

use crate::game::{GameConfig, GameState, TickResult};
use crate::input::{InputHandler, IntentBuffer, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Interactive play in the terminal.
///
/// One thread owns everything: key events fill the intent buffer, the tick
/// timer drains one intent per tick, so an intent is always applied before
/// the move of the tick that observes it.
pub struct HumanMode {
    config: GameConfig,
    state: GameState,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    intents: IntentBuffer,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let state = GameState::new(config.clone()).context("Invalid game configuration")?;

        Ok(Self {
            config,
            state,
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            intents: IntentBuffer::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            width = self.config.grid_width,
            height = self.config.grid_height,
            "Session started"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal even if the loop failed
        let cleanup = self.cleanup_terminal(&mut terminal);

        info!(
            games = self.stats.games_played(),
            best_score = self.stats.best_score(),
            longest = self.stats.longest_snake(),
            "Session ended"
        );

        result.and(cleanup)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks at `speed` Hz; rebuilt whenever the speed changes
        let mut tick_timer = interval(self.state.tick_interval());
        let mut current_speed = self.state.speed();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.state.speed() != current_speed {
                current_speed = self.state.speed();
                tick_timer = rebuilt_timer(self.state.tick_interval());
                debug!(speed = current_speed, "Tick rate changed");
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                if !self.state.is_game_over() {
                    self.intents.push(direction);
                }
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        if self.state.is_game_over() {
            return;
        }

        let intent = self.intents.take();
        if self.state.tick(intent) != TickResult::GameOver {
            return;
        }

        if let Some(record) = self.stats.finish_game(&self.state.snapshot()) {
            info!(
                score = record.score,
                length = record.length,
                ticks = record.ticks,
                secs = record.duration.as_secs(),
                "Game recorded"
            );
        }
    }

    fn reset_game(&mut self) {
        // The configuration was validated when the first game started
        match GameState::new(self.config.clone()) {
            Ok(state) => self.state = state,
            Err(err) => {
                debug!(%err, "Restart refused");
                return;
            }
        }
        self.stats.start_game();
        self.intents.clear();
        info!("Game restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// A tick timer whose first tick is one full period away
fn rebuilt_timer(period: Duration) -> Interval {
    interval_at(Instant::now() + period, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default().with_seed(8)).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(!mode.state.is_game_over());
        assert_eq!(mode.state.score(), 0);
        assert!(mode.intents.is_empty());
    }

    #[test]
    fn test_invalid_config_fails() {
        assert!(HumanMode::new(GameConfig::new(0, 0)).is_err());
    }

    #[test]
    fn test_key_press_queues_intent_for_next_tick() {
        let mut mode = mode();
        mode.state.place_food(Cell::new(20, 20));

        mode.handle_event(key(KeyCode::Down));
        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.intents.len(), 2);

        mode.update_game();
        assert_eq!(mode.state.snake().direction(), Direction::Down);
        mode.update_game();
        assert_eq!(mode.state.snake().direction(), Direction::Left);
        assert!(mode.intents.is_empty());
    }

    #[test]
    fn test_game_over_is_recorded() {
        let config = GameConfig {
            initial_snake_length: 5,
            ..GameConfig::default().with_seed(8)
        };
        let mut mode = HumanMode::new(config).unwrap();
        mode.state.place_food(Cell::new(20, 20));

        for code in [KeyCode::Down, KeyCode::Left, KeyCode::Up] {
            mode.handle_event(key(code));
            mode.update_game();
        }

        assert!(mode.state.is_game_over());
        assert_eq!(mode.stats.games_played(), 1);
        assert_eq!(mode.stats.longest_snake(), 5);

        // Further ticks leave the finished game alone
        mode.update_game();
        assert_eq!(mode.stats.games_played(), 1);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        mode.state.place_food(Cell::new(6, 5));
        mode.update_game();
        assert_eq!(mode.state.score(), 10);
        mode.handle_event(key(KeyCode::Up));

        mode.handle_event(key(KeyCode::Char('r')));

        assert_eq!(mode.state.score(), 0);
        assert!(!mode.state.is_game_over());
        assert!(mode.intents.is_empty());
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
