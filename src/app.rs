use std::cell::Cell as Flag;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::Backend, Terminal};

use crate::config::GameConfig;
use crate::feedback::Feedback;
use crate::input::{command_for_key, Command, SwipeTracker};
use crate::render::render_frame;
use crate::session::{Session, SessionState, Snapshot};
use crate::stats::StatsStore;

/// How long to wait for input when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Terminal front end around one [`Session`].
pub struct App {
    session: Session,
    high_score: u32,
    swipes: SwipeTracker,
    dirty: Rc<Flag<bool>>,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: GameConfig,
        stats: Box<dyn StatsStore>,
        feedback: Box<dyn Feedback>,
        now: Instant,
    ) -> Self {
        let mut session = Session::new(config, StdRng::from_entropy(), now);
        session.set_stats_store(stats);
        session.set_feedback(feedback);

        let dirty = Rc::new(Flag::new(true));
        let flag = Rc::clone(&dirty);
        session.subscribe(move |_: &Snapshot| flag.set(true));

        App {
            high_score: session.high_score(),
            session,
            swipes: SwipeTracker::new(),
            dirty,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit() {
            if self.dirty.replace(false) {
                let snapshot = self.session().snapshot();
                let grid_size = self.session().config().grid_size;
                let high_score = self.high_score;
                terminal.draw(|f| render_frame(f, &snapshot, grid_size, high_score))?;
            }

            let timeout = self
                .session()
                .next_deadline(Instant::now())
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout)? {
                let event = event::read()?;
                self.handle_event(event, Instant::now());
            }
            self.update(Instant::now());
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(command) = command_for_key(key) {
                    self.apply(command, now);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(direction) = self.swipes.handle_mouse(mouse) {
                    self.apply(Command::Turn(direction), now);
                }
            }
            Event::Resize(..) => self.dirty.set(true),
            _ => {}
        }
    }

    /// Fires due timers.
    pub fn update(&mut self, now: Instant) {
        let was_over = self.session.is_over();
        self.session.advance_clock(now);
        if !was_over {
            self.after_move();
        }
    }

    fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::Turn(direction) => {
                if self.session.state() == SessionState::Running {
                    self.session.submit_direction(direction, now);
                    self.after_move();
                }
            }
            Command::Restart => {
                if self.session.is_over() {
                    if let Err(e) = self.session.reset(now) {
                        error!("Error restarting: {}", e);
                    }
                }
            }
            Command::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
        }
    }

    fn after_move(&mut self) {
        if let Some(stats) = self.session.final_stats() {
            self.high_score = self.high_score.max(stats.points);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::NoFeedback;
    use crate::grid::Direction;
    use crate::stats::{MemoryStore, StatsRecord};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app(t0: Instant) -> App {
        let mut stats = MemoryStore::new();
        stats.append(StatsRecord { points: 6, seconds: 30 }).unwrap();
        App::new(GameConfig::default(), Box::new(stats), Box::new(NoFeedback), t0)
    }

    #[test]
    fn test_high_score_loaded_from_history() {
        let app = app(Instant::now());
        assert_eq!(app.high_score, 6);
    }

    #[test]
    fn test_arrow_key_moves_snake() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.dirty.set(false);

        app.handle_event(press(KeyCode::Down), t0);

        let snap = app.session().snapshot();
        assert_eq!(snap.direction, Direction::Down);
        assert_eq!(snap.cells.last().map(|c| (c.row, c.col)), Some((1, 1)));
        assert!(app.dirty.get());
    }

    #[test]
    fn test_crash_then_restart() {
        let t0 = Instant::now();
        let mut app = app(t0);

        app.handle_event(press(KeyCode::Up), t0);
        assert!(app.session().is_over());

        // Turning is ignored while the game is over.
        app.handle_event(press(KeyCode::Down), t0);
        assert!(app.session().is_over());

        app.handle_event(press(KeyCode::Char(' ')), t0);
        assert!(!app.session().is_over());
        assert_eq!(app.session().snapshot().score, 0);
    }

    #[test]
    fn test_quit() {
        let t0 = Instant::now();
        let mut app = app(t0);
        assert!(!app.should_quit());
        app.handle_event(press(KeyCode::Esc), t0);
        assert!(app.should_quit());
    }

    #[test]
    fn test_update_fires_timers() {
        let t0 = Instant::now();
        let mut app = app(t0);

        app.update(t0 + Duration::from_millis(2000));

        let snap = app.session().snapshot();
        assert_eq!(snap.elapsed_secs, 2);
        let wait = app
            .session()
            .next_deadline(t0 + Duration::from_millis(2000))
            .unwrap();
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_millis(500));
    }
}
