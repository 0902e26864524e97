use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::engine::Collision;
use crate::grid::{Cell, Direction as Heading};
use crate::session::Snapshot;

const BODY_SYMBOL: &str = "▓▓";
const FOOD_SYMBOL: &str = "●";

/// Board cells are two columns wide so the grid looks square.
const CELL_WIDTH: u16 = 2;

fn head_symbol(heading: Heading) -> &'static str {
    match heading {
        Heading::Up => "/\\",
        Heading::Down => "\\/",
        Heading::Left => "<:",
        Heading::Right => ":>",
    }
}

fn crash_reason(collision: Option<Collision>) -> &'static str {
    match collision {
        Some(Collision::Wall) => "Hit the wall",
        Some(Collision::SelfHit) => "Bit itself",
        None => "",
    }
}

pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// The playing field for one snapshot.
pub struct BoardView<'a> {
    pub snapshot: &'a Snapshot,
    pub grid_size: u16,
}

impl BoardView<'_> {
    /// Outer size including the border.
    pub fn size(grid_size: u16) -> (u16, u16) {
        (grid_size * CELL_WIDTH + 2, grid_size + 2)
    }

    fn paint(&self, cell: Cell, area: Rect, buf: &mut Buffer, symbol: &str, style: Style) {
        if !cell.is_inside(self.grid_size) {
            return;
        }
        let (Ok(row), Ok(col)) = (u16::try_from(cell.row), u16::try_from(cell.col)) else {
            return;
        };
        let x = area.x + col * CELL_WIDTH;
        let y = area.y + row;
        if x + CELL_WIDTH <= area.right() && y < area.bottom() {
            buf.set_string(x, y, symbol, style);
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.snapshot.game_over { "Game over" } else { "Snake" };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(food) = self.snapshot.food {
            self.paint(food, inner, buf, FOOD_SYMBOL, Style::default().fg(Color::LightRed));
        }

        let body_color = if self.snapshot.game_over {
            Color::DarkGray
        } else {
            Color::Green
        };
        if let Some((head, body)) = self.snapshot.cells.split_last() {
            for &cell in body {
                self.paint(cell, inner, buf, BODY_SYMBOL, Style::default().fg(body_color));
            }
            let symbol = head_symbol(self.snapshot.direction);
            self.paint(*head, inner, buf, symbol, Style::default().fg(Color::Yellow));
        }
    }
}

/// Header, board and the game-over banner.
pub fn render_frame(frame: &mut Frame, snapshot: &Snapshot, grid_size: u16, high_score: u32) {
    let (board_width, board_height) = BoardView::size(grid_size);
    let layout = Layout::default()
        .direction(layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(board_height)])
        .split(frame.area());

    let header = format!(
        "Score: {}    Time: {}    Speed: x{:.2}    High Score: {}",
        snapshot.score,
        format_time(snapshot.elapsed_secs),
        snapshot.speed,
        high_score.max(snapshot.score)
    );
    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL)),
        layout[0],
    );

    let board_area = Rect {
        width: board_width.min(layout[1].width),
        ..layout[1]
    };
    frame.render_widget(
        BoardView {
            snapshot,
            grid_size,
        },
        board_area,
    );

    if snapshot.game_over {
        let banner = Rect {
            x: board_area.x + board_area.width.saturating_sub(30) / 2,
            y: board_area.y + board_area.height.saturating_sub(5) / 2,
            width: 30.min(board_area.width),
            height: 5.min(board_area.height),
        };
        frame.render_widget(Clear, banner);
        frame.render_widget(
            Paragraph::new(format!(
                "GAME OVER: {}\n{} points in {}\nSPACE: again   Q: quit",
                crash_reason(snapshot.collision),
                snapshot.score,
                format_time(snapshot.elapsed_secs)
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
            banner,
        );
    }
}
