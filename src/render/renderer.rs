use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, GameState};
use crate::metrics::SessionStats;

const MIN_BOARD_WIDTH: u16 = 44;

/// Draws the game state, HUD and controls into a ratatui frame
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<R>(&self, frame: &mut Frame, state: &GameState<R>, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // HUD
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_hud(state, stats), chunks[0]);

        // Two terminal columns per cell plus the border, wide enough for the
        // game over panel on small grids
        let board_width = u16::try_from(state.grid().width() * 2 + 2)
            .unwrap_or(u16::MAX)
            .max(MIN_BOARD_WIDTH);
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(board_width),
                Constraint::Min(0),
            ])
            .split(chunks[1])[1];

        if state.is_game_over() {
            frame.render_widget(self.render_game_over(state, stats), game_area);
        } else {
            frame.render_widget(self.render_grid(state), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid<R>(&self, state: &GameState<R>) -> Paragraph<'static> {
        let snake = state.snake();
        let head = snake.head();
        let food = state.food();
        let grid = state.grid();

        let lines: Vec<Line> = (0..grid.height() as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..grid.width() as i32)
                    .map(|x| {
                        let cell = Cell::new(x, y);
                        if cell == head {
                            Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if snake.occupies(cell) {
                            Span::styled("□ ", Style::default().fg(Color::Green))
                        } else if cell == food {
                            Span::styled(
                                "● ",
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled("· ", Style::default().fg(Color::DarkGray))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_hud<R>(&self, state: &GameState<R>, stats: &SessionStats) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score().to_string(), value),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(state.level().to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(state.speed().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.clock(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over<R>(&self, state: &GameState<R>, stats: &SessionStats) -> Paragraph<'static> {
        let yellow = Style::default().fg(Color::Yellow);
        let bold_white = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let gray = Style::default().fg(Color::Gray);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", yellow),
                Span::styled(state.score().to_string(), bold_white),
                Span::raw("   "),
                Span::styled("Level: ", yellow),
                Span::styled(state.level().to_string(), bold_white),
            ]),
            Line::from(vec![
                Span::styled("Best: ", yellow),
                Span::styled(stats.best_score().to_string(), bold_white),
                Span::raw("   "),
                Span::styled("Games: ", yellow),
                Span::styled(stats.games_played().to_string(), bold_white),
                Span::raw("   "),
                Span::styled("Longest: ", yellow),
                Span::styled(stats.longest_snake().to_string(), bold_white),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", gray),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", gray),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", gray),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}
