mod app;
mod config;
mod engine;
mod error;
mod feedback;
mod grid;
mod input;
mod render;
mod session;
mod stats;
mod timer;

use std::fs::File;
use std::io;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;
use simplelog::{Config, WriteLogger};

use crate::app::App;
use crate::config::Args;
use crate::feedback::{Feedback, NoFeedback, TerminalBell};
use crate::stats::JsonFileStore;

fn main() -> Result<(), io::Error> {
    let args = Args::parse();

    // Set up logging before anything else
    WriteLogger::init(args.log_level, Config::default(), File::create(&args.log_file)?)
        .map_err(io::Error::other)?;

    info!("Starting snek-session");

    let stats = JsonFileStore::new(&args.stats_dir);
    info!("Session history at {}", stats.path().display());
    let feedback: Box<dyn Feedback> = if args.no_bell {
        Box::new(NoFeedback)
    } else {
        Box::new(TerminalBell::new(io::stdout()))
    };
    let mut app = App::new(args.game_config(), Box::new(stats), feedback, Instant::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);
    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting snek-session");
    result
}
