//! One game from the first tick to the crash.
//!
//! The session owns all mutable game state and both timers. Commands and timer
//! firings are applied one at a time by whoever drives it, and every committed
//! transition is pushed to the registered observers as a [`Snapshot`].

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{GameConfig, SECONDS_PERIOD};
use crate::engine::{self, Collision, Snake, StepResult};
use crate::error::SnakeError;
use crate::feedback::{Feedback, NoFeedback, PULSE};
use crate::grid::{Cell, Direction};
use crate::stats::{MemoryStore, StatsRecord, StatsStore};
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Crashed(Collision),
    /// The session was already over.
    Ignored,
}

/// Read-only view handed to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Tail-first, head-last.
    pub cells: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub score: u32,
    pub elapsed_secs: u64,
    pub game_over: bool,
    pub speed: f64,
    pub collision: Option<Collision>,
}

pub type Observer = Box<dyn FnMut(&Snapshot)>;

pub struct Session<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    elapsed_secs: u64,
    speed: f64,
    state: SessionState,
    collision: Option<Collision>,
    final_stats: Option<StatsRecord>,
    move_timer: Timer,
    seconds_timer: Timer,
    observers: Vec<Observer>,
    feedback: Box<dyn Feedback>,
    feedback_warned: bool,
    stats: Box<dyn StatsStore>,
}

impl<R: Rng> Session<R> {
    /// Starts a running session with both timers armed from `now`.
    pub fn new(config: GameConfig, mut rng: R, now: Instant) -> Self {
        let snake = Snake::new(config.initial_cells.iter().copied(), config.initial_direction);
        let food = engine::pick_random_free_cell(snake.cells(), config.grid_size, &mut rng);

        let mut move_timer = Timer::new(config.tick_period(1.0));
        let mut seconds_timer = Timer::new(SECONDS_PERIOD);
        move_timer.start(now);
        seconds_timer.start(now);

        info!(
            "Starting session on a {0}x{0} grid, heading {1}",
            config.grid_size,
            snake.direction()
        );

        Session {
            config,
            rng,
            snake,
            food,
            score: 0,
            elapsed_secs: 0,
            speed: 1.0,
            state: SessionState::Running,
            collision: None,
            final_stats: None,
            move_timer,
            seconds_timer,
            observers: Vec::new(),
            feedback: Box::new(NoFeedback),
            feedback_warned: false,
            stats: Box::new(MemoryStore::new()),
        }
    }

    pub fn set_feedback(&mut self, feedback: Box<dyn Feedback>) {
        self.feedback = feedback;
        self.feedback_warned = false;
    }

    pub fn set_stats_store(&mut self, stats: Box<dyn StatsStore>) {
        self.stats = stats;
    }

    /// Registers `observer` for every snapshot from now on.
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Stats recorded at game over, if the game is over.
    pub fn final_stats(&self) -> Option<StatsRecord> {
        self.final_stats
    }

    pub fn high_score(&self) -> u32 {
        self.stats.high_score()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.snake.cells().collect(),
            direction: self.snake.direction(),
            food: self.food,
            score: self.score,
            elapsed_secs: self.elapsed_secs,
            game_over: self.is_over(),
            speed: self.speed,
            collision: self.collision,
        }
    }

    /// Applies a direction command and moves right away.
    ///
    /// The pending movement deadline restarts from `now` so the timer cannot
    /// fire a second move straight after this one.
    pub fn submit_direction(&mut self, direction: Direction, now: Instant) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Ignored;
        }
        let outcome = self.step(direction, now);
        self.move_timer.reschedule(now);
        outcome
    }

    /// Timer-driven move in the current direction.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Ignored;
        }
        let direction = self.snake.direction();
        self.step(direction, now)
    }

    /// Counts one second of play. Returns false once the game is over.
    pub fn seconds_tick(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.elapsed_secs += 1;
        self.notify();
        true
    }

    /// How long the event loop may wait before a timer wants to fire.
    /// `None` once both timers are cancelled.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        match (self.move_timer.time_until(now), self.seconds_timer.time_until(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn next_due(&self) -> Option<Instant> {
        match (self.move_timer.next_due(), self.seconds_timer.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires every timer deadline up to `now`, earliest first.
    pub fn advance_clock(&mut self, now: Instant) {
        while let Some(due) = self.next_due() {
            if due > now {
                break;
            }
            if self.move_timer.next_due() == Some(due) {
                self.move_timer.poll(due);
                self.tick(due);
            } else {
                self.seconds_timer.poll(due);
                self.seconds_tick();
            }
        }
    }

    /// Starts a fresh game. Only valid once the current one is over.
    pub fn reset(&mut self, now: Instant) -> Result<(), SnakeError> {
        if !self.is_over() {
            return Err(SnakeError::NotGameOver);
        }

        self.snake = Snake::new(
            self.config.initial_cells.iter().copied(),
            self.config.initial_direction,
        );
        self.food =
            engine::pick_random_free_cell(self.snake.cells(), self.config.grid_size, &mut self.rng);
        self.score = 0;
        self.elapsed_secs = 0;
        self.speed = 1.0;
        self.state = SessionState::Running;
        self.collision = None;
        self.final_stats = None;
        self.move_timer = Timer::new(self.config.tick_period(1.0));
        self.seconds_timer = Timer::new(SECONDS_PERIOD);
        self.move_timer.start(now);
        self.seconds_timer.start(now);

        info!("Session reset");
        self.notify();
        Ok(())
    }

    fn step(&mut self, requested: Direction, now: Instant) -> TickOutcome {
        let outcome = match engine::step(&self.snake, requested, self.food, self.config.grid_size) {
            StepResult::Crashed(collision) => {
                self.finish(collision);
                TickOutcome::Crashed(collision)
            }
            StepResult::Ate(snake) => {
                self.snake = snake;
                self.eat(now);
                TickOutcome::Ate
            }
            StepResult::Moved(snake) => {
                self.snake = snake;
                TickOutcome::Moved
            }
        };
        self.notify();
        outcome
    }

    fn eat(&mut self, now: Instant) {
        self.score += 1;
        self.speed *= self.config.speed_growth;
        self.food =
            engine::pick_random_free_cell(self.snake.cells(), self.config.grid_size, &mut self.rng);
        self.move_timer.set_period(self.config.tick_period(self.speed));
        self.move_timer.reschedule(now);
        debug!(
            "Food eaten: score {}, length {}, speed {:.2}, next move in {:?}, next food {:?}",
            self.score,
            self.snake.len(),
            self.speed,
            self.move_timer.period(),
            self.food
        );

        if let Err(e) = self.feedback.pulse(PULSE) {
            if !self.feedback_warned {
                warn!("Haptic feedback unavailable: {}", e);
                self.feedback_warned = true;
            }
        }
    }

    fn finish(&mut self, collision: Collision) {
        self.state = SessionState::GameOver;
        self.collision = Some(collision);
        self.move_timer.cancel();
        self.seconds_timer.cancel();

        let record = StatsRecord {
            points: self.score,
            seconds: self.elapsed_secs,
        };
        self.final_stats = Some(record);
        info!(
            "Game over ({:?}): {} points in {}s",
            collision, record.points, record.seconds
        );

        if let Err(e) = self.stats.append(record) {
            error!("Error saving session stats: {}", e);
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}
