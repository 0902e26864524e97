use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use simplelog::LevelFilter;

use crate::grid::{Cell, Direction};

pub const DEFAULT_GRID_SIZE: u16 = 20;
pub const BASE_SPEED: Duration = Duration::from_millis(500);
pub const SPEED_GROWTH: f64 = 1.1;
pub const SECONDS_PERIOD: Duration = Duration::from_secs(1);

/// Everything a session needs to start a game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid_size: u16,
    /// Movement period at speed 1.0.
    pub base_speed: Duration,
    /// Speed multiplier applied per food eaten.
    pub speed_growth: f64,
    /// Tail-first starting cells.
    pub initial_cells: Vec<Cell>,
    pub initial_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: DEFAULT_GRID_SIZE,
            base_speed: BASE_SPEED,
            speed_growth: SPEED_GROWTH,
            initial_cells: vec![Cell::new(0, 0), Cell::new(0, 1)],
            initial_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    /// Movement period for a given speed multiplier.
    pub fn tick_period(&self, speed: f64) -> Duration {
        self.base_speed.div_f64(speed)
    }

    /// Starts the snake in the middle of the board facing `direction`.
    /// Right keeps the top-left corner start.
    pub fn facing(mut self, direction: Direction) -> Self {
        if direction != Direction::Right {
            let mid = i32::from(self.grid_size / 2);
            let head = Cell::new(mid, mid);
            let tail = head.offset(direction.opposite().into());
            self.initial_cells = vec![tail, head];
        }
        self.initial_direction = direction;
        self
    }
}

#[derive(Parser, Debug)]
#[command(name = "snek-session", version, about = "Single-player terminal snake")]
pub struct Args {
    /// Side length of the square board, in cells
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE, value_parser = clap::value_parser!(u16).range(4..=200))]
    pub grid_size: u16,

    /// Movement period in milliseconds at the starting speed
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(10..))]
    pub base_speed_ms: u64,

    /// Speed multiplier applied each time food is eaten
    #[arg(long, default_value_t = SPEED_GROWTH, value_parser = parse_growth)]
    pub speed_growth: f64,

    /// Initial heading (up, right, down, left)
    #[arg(long, default_value = "right")]
    pub start_direction: Direction,

    /// Directory holding the session history
    #[arg(long, default_value = ".")]
    pub stats_dir: PathBuf,

    #[arg(long, default_value = "snek-session.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Do not ring the terminal bell when food is eaten
    #[arg(long)]
    pub no_bell: bool,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            grid_size: self.grid_size,
            base_speed: Duration::from_millis(self.base_speed_ms),
            speed_growth: self.speed_growth,
            ..GameConfig::default()
        }
        .facing(self.start_direction)
    }
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level {s:?}"))
}

fn parse_growth(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && (1.0..=4.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("speed growth must be between 1.0 and 4.0, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.base_speed, Duration::from_millis(500));
        assert_eq!(config.initial_cells, vec![Cell::new(0, 0), Cell::new(0, 1)]);
        assert_eq!(config.initial_direction, Direction::Right);
    }

    #[test]
    fn test_tick_period() {
        let config = GameConfig::default();
        assert_eq!(config.tick_period(1.0), Duration::from_millis(500));
        assert_eq!(config.tick_period(2.0), Duration::from_millis(250));
    }

    #[test]
    fn test_facing_centres_snake() {
        let config = GameConfig::default().facing(Direction::Up);
        assert_eq!(config.initial_cells, vec![Cell::new(11, 10), Cell::new(10, 10)]);
        assert_eq!(config.initial_direction, Direction::Up);

        let config = GameConfig::default().facing(Direction::Right);
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["snek-session"]);
        assert_eq!(args.game_config(), GameConfig::default());
        assert_eq!(args.log_level, LevelFilter::Info);
        assert!(!args.no_bell);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "snek-session",
            "--grid-size",
            "12",
            "--base-speed-ms",
            "300",
            "--speed-growth",
            "1.2",
            "--start-direction",
            "left",
        ]);
        let config = args.game_config();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.base_speed, Duration::from_millis(300));
        assert_eq!(config.speed_growth, 1.2);
        assert_eq!(config.initial_direction, Direction::Left);
        assert_eq!(config.initial_cells, vec![Cell::new(6, 7), Cell::new(6, 6)]);
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["snek-session", "--start-direction", "sideways"]).is_err());
        assert!(Args::try_parse_from(["snek-session", "--speed-growth", "0.5"]).is_err());
        assert!(Args::try_parse_from(["snek-session", "--grid-size", "2"]).is_err());
    }
}
