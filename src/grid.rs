use std::fmt;
use std::str::FromStr;

use crate::error::SnakeError;

/// A square on the board. Row grows downward, column grows rightward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    pub fn offset(&self, delta: CellDelta) -> Cell {
        Cell {
            row: self.row + delta.row,
            col: self.col + delta.col,
        }
    }

    /// True when the cell lies on a `grid_size` x `grid_size` board.
    pub fn is_inside(&self, grid_size: u16) -> bool {
        let n = i32::from(grid_size);
        (0..n).contains(&self.row) && (0..n).contains(&self.col)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Cell { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDelta {
    pub row: i32,
    pub col: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }
}

impl From<Direction> for CellDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => CellDelta { row: -1, col: 0 },
            Direction::Down => CellDelta { row: 1, col: 0 },
            Direction::Left => CellDelta { row: 0, col: -1 },
            Direction::Right => CellDelta { row: 0, col: 1 },
        }
    }
}

impl FromStr for Direction {
    type Err = SnakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let alias = match name.as_str() {
            "u" | "north" => Some(Direction::Up),
            "r" | "east" => Some(Direction::Right),
            "d" | "south" => Some(Direction::Down),
            "l" | "west" => Some(Direction::Left),
            _ => None,
        };
        alias
            .or_else(|| Direction::ALL.into_iter().find(|dir| dir.to_string() == name))
            .ok_or_else(|| SnakeError::InvalidDirection(s.to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}
