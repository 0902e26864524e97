//! Pure movement, collision and growth rules.
//!
//! Nothing in here owns state: every function takes the snake, food and board
//! size it needs and hands back new values.

use std::collections::{HashSet, VecDeque};
use std::iter;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Direction};

/// Random draws tried before falling back to sampling the free-cell list.
const PLACEMENT_ATTEMPTS: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    head: Cell,
    /// Tail-first, excluding the head. Never empty.
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    /// Builds a snake from tail-first cells; the last cell is the head.
    ///
    /// Panics when fewer than two cells are given.
    pub fn new(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let mut body: VecDeque<Cell> = cells.into_iter().collect();
        match body.pop_back() {
            Some(head) if !body.is_empty() => Snake {
                head,
                body,
                direction,
            },
            _ => panic!("a snake needs at least two cells"),
        }
    }

    pub fn head(&self) -> Cell {
        self.head
    }

    pub fn tail(&self) -> Cell {
        self.body.front().copied().unwrap_or(self.head)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Tail-first, head-last.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied().chain(iter::once(self.head))
    }

    pub fn len(&self) -> usize {
        self.body.len() + 1
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.head == cell || self.body.contains(&cell)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfHit,
}

#[derive(Debug, PartialEq)]
pub enum StepResult {
    /// Normal movement; length unchanged.
    Moved(Snake),
    /// Food eaten; the vacated tail cell has been re-attached.
    Ate(Snake),
    /// Terminal move; the snake is left where it was.
    Crashed(Collision),
}

/// Applies the reversal rule: a request for the exact opposite of the
/// current heading keeps the current heading.
pub fn resolve_direction(current: Direction, requested: Direction) -> Direction {
    if current.is_opposite(requested) {
        current
    } else {
        requested
    }
}

/// Drops the tail and appends a new head one cell along `direction`.
pub fn advance(snake: &Snake, direction: Direction) -> Snake {
    let mut body = snake.body.clone();
    body.push_back(snake.head);
    body.pop_front();

    Snake {
        head: snake.head.offset(direction.into()),
        body,
        direction,
    }
}

pub fn hits_wall(snake: &Snake, grid_size: u16) -> bool {
    !snake.head().is_inside(grid_size)
}

pub fn hits_self(snake: &Snake) -> bool {
    snake.body.contains(&snake.head)
}

pub fn eats_food(snake: &Snake, food: Cell) -> bool {
    snake.contains(food)
}

/// Re-attaches `vacated` at the tail end.
pub fn grow(mut snake: Snake, vacated: Cell) -> Snake {
    snake.body.push_front(vacated);
    snake
}

/// One full tick: direction resolution, movement, collision, then food.
///
/// Collisions are checked before food so a food cell on an illegal head
/// position never counts as eaten.
pub fn step(snake: &Snake, requested: Direction, food: Option<Cell>, grid_size: u16) -> StepResult {
    let direction = resolve_direction(snake.direction, requested);
    let moved = advance(snake, direction);

    if hits_wall(&moved, grid_size) {
        return StepResult::Crashed(Collision::Wall);
    }
    if hits_self(&moved) {
        return StepResult::Crashed(Collision::SelfHit);
    }

    match food {
        Some(food) if eats_food(&moved, food) => StepResult::Ate(grow(moved, snake.tail())),
        _ => StepResult::Moved(moved),
    }
}

/// Uniformly picks a cell of the board not in `excluded`.
///
/// Starts with rejection sampling and falls back to sampling the explicit
/// free list so a crowded board still terminates. Returns `None` only when
/// every cell is excluded.
pub fn pick_random_free_cell(
    excluded: impl IntoIterator<Item = Cell>,
    grid_size: u16,
    rng: &mut impl Rng,
) -> Option<Cell> {
    let n = i32::from(grid_size);
    if n == 0 {
        return None;
    }
    let excluded: HashSet<Cell> = excluded.into_iter().collect();

    for _ in 0..PLACEMENT_ATTEMPTS {
        let cell = Cell::new(rng.gen_range(0..n), rng.gen_range(0..n));
        if !excluded.contains(&cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = (0..n)
        .flat_map(|row| (0..n).map(move |col| Cell::new(row, col)))
        .filter(|cell| !excluded.contains(cell))
        .collect();
    free.choose(rng).copied()
}
