use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{PlayerColor, PlayerView, Vector2, WorldSnapshot};
use crate::metrics::GameMetrics;

pub fn palette_color(color: PlayerColor) -> Color {
    match color {
        PlayerColor::Yellow => Color::Yellow,
        PlayerColor::Magenta => Color::Magenta,
        PlayerColor::Cyan => Color::Cyan,
        PlayerColor::White => Color::White,
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &WorldSnapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Scores
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_scores(snapshot, metrics), chunks[0]);
        frame.render_widget(self.render_board(snapshot), chunks[1]);
        frame.render_widget(self.render_controls(), chunks[2]);

        if snapshot.game_over {
            let area = centered(chunks[1], 36, snapshot.players.len() as u16 + 6);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_game_over(snapshot), area);
        }
    }

    /// The whole screen rectangle, border included, one character per cell
    pub fn board_lines(&self, snapshot: &WorldSnapshot) -> Vec<Line<'static>> {
        let bounds = snapshot.boundaries;
        let mut cells: HashMap<Vector2, Span<'static>> = HashMap::new();

        for food in &snapshot.food {
            cells.insert(*food, Span::styled("#", Style::default().fg(Color::White)));
        }

        // dead snakes first so living ones draw on top
        let mut players: Vec<&PlayerView> = snapshot.players.iter().collect();
        players.sort_by_key(|player| player.alive);
        for player in players {
            let style = if player.alive {
                Style::default()
                    .fg(palette_color(player.color))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            for (index, segment) in player.segments.iter().enumerate().rev() {
                let glyph = if index == 0 { "@" } else { "O" };
                cells.insert(*segment, Span::styled(glyph, style));
            }
        }

        let border = Style::default().fg(Color::White);
        let mut lines = Vec::new();
        for y in 0..=bounds.max_y {
            let mut spans = Vec::new();
            for x in 0..=bounds.max_x {
                let on_x_edge = x == 0 || x == bounds.max_x;
                let on_y_edge = y == 0 || y == bounds.max_y;
                let span = match (on_x_edge, on_y_edge) {
                    (true, true) => Span::styled("+", border),
                    (false, true) => Span::styled("-", border),
                    (true, false) => Span::styled("|", border),
                    (false, false) => cells
                        .remove(&Vector2::new(x, y))
                        .unwrap_or_else(|| Span::raw(" ")),
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn render_board(&self, snapshot: &WorldSnapshot) -> Paragraph<'static> {
        Paragraph::new(self.board_lines(snapshot)).alignment(Alignment::Center)
    }

    fn render_scores(&self, snapshot: &WorldSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for player in &snapshot.players {
            let mut style = Style::default().fg(palette_color(player.color));
            if !player.alive {
                style = style.add_modifier(Modifier::CROSSED_OUT);
            }
            spans.push(Span::styled(format!("{} ", player.name), style));
            spans.push(Span::styled(
                player.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw("    "));
        }
        spans.push(Span::styled("Time: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            metrics.format_time(),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw("    "));
        spans.push(Span::styled("Best: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            metrics.high_score.to_string(),
            Style::default().fg(Color::White),
        ));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    /// Final standings: score descending, ties in join order
    pub fn standings_lines(&self, snapshot: &WorldSnapshot) -> Vec<Line<'static>> {
        snapshot
            .standings()
            .into_iter()
            .enumerate()
            .map(|(rank, player)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}. ", rank + 1),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        format!("{:<10} {:>10}", player.name, player.score),
                        Style::default().fg(palette_color(player.color)),
                    ),
                ])
            })
            .collect()
    }

    fn render_game_over(&self, snapshot: &WorldSnapshot) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];
        text.extend(self.standings_lines(snapshot));
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Yellow)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("IJKL", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("8456", Style::default().fg(Color::White)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" reset | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
