//! Turns terminal events into game commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::grid::Direction;

/// Minimum swipe displacement, in touch units, before it counts as a turn.
pub const SWIPE_THRESHOLD: i32 = 50;

/// Touch units per terminal cell, used to scale mouse drags.
pub const CELL_UNITS: (i32, i32) = (10, 20);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Restart,
    Quit,
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Command::Turn(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::Turn(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Command::Turn(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Command::Turn(Direction::Right))
        }
        KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Direction of a gesture with displacement (`dx`, `dy`), if it is long enough.
///
/// The axis with the larger displacement wins; `dy` grows downward.
pub fn swipe_direction(dx: i32, dy: i32, threshold: i32) -> Option<Direction> {
    if dx.abs() >= dy.abs() {
        if dx > threshold {
            Some(Direction::Right)
        } else if dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Direction::Down)
    } else if dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Treats a left-button press and release as a swipe.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (col, row) = self.start.take()?;
                let dx = (i32::from(event.column) - i32::from(col)) * CELL_UNITS.0;
                let dy = (i32::from(event.row) - i32::from(row)) * CELL_UNITS.1;
                swipe_direction(dx, dy, SWIPE_THRESHOLD)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(command_for_key(key(KeyCode::Up)), Some(Command::Turn(Direction::Up)));
        assert_eq!(command_for_key(key(KeyCode::Down)), Some(Command::Turn(Direction::Down)));
        assert_eq!(command_for_key(key(KeyCode::Left)), Some(Command::Turn(Direction::Left)));
        assert_eq!(command_for_key(key(KeyCode::Right)), Some(Command::Turn(Direction::Right)));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(command_for_key(key(KeyCode::Char('w'))), Some(Command::Turn(Direction::Up)));
        assert_eq!(command_for_key(key(KeyCode::Char('A'))), Some(Command::Turn(Direction::Left)));
        assert_eq!(command_for_key(key(KeyCode::Char('s'))), Some(Command::Turn(Direction::Down)));
        assert_eq!(command_for_key(key(KeyCode::Char('d'))), Some(Command::Turn(Direction::Right)));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(command_for_key(key(KeyCode::Char(' '))), Some(Command::Restart));
        assert_eq!(command_for_key(key(KeyCode::Enter)), Some(Command::Restart));
        assert_eq!(command_for_key(key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for_key(key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_swipe_direction() {
        assert_eq!(swipe_direction(80, 10, 50), Some(Direction::Right));
        assert_eq!(swipe_direction(-80, 10, 50), Some(Direction::Left));
        assert_eq!(swipe_direction(10, 80, 50), Some(Direction::Down));
        assert_eq!(swipe_direction(10, -80, 50), Some(Direction::Up));
    }

    #[test]
    fn test_short_swipe_ignored() {
        assert_eq!(swipe_direction(50, 0, 50), None);
        assert_eq!(swipe_direction(0, -50, 50), None);
        assert_eq!(swipe_direction(30, 40, 50), None);
    }

    #[test]
    fn test_mouse_drag_as_swipe() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(tracker.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)), None);
        assert_eq!(
            tracker.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 17, 11)),
            Some(Direction::Right)
        );

        tracker.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        assert_eq!(
            tracker.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10, 6)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_release_without_press() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(tracker.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, 0)), None);
    }
}
