use std::io::{self, Write};
use std::time::Duration;

use thiserror::Error;

pub const PULSE: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("no haptic device available")]
    Unsupported,
    #[error("feedback output failed: {0}")]
    Io(#[from] io::Error),
}

/// Host-side haptics. Callers treat every error as non-fatal.
pub trait Feedback {
    fn pulse(&mut self, duration: Duration) -> Result<(), FeedbackError>;
}

/// Used when the host has nothing to buzz.
#[derive(Debug, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn pulse(&mut self, _duration: Duration) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unsupported)
    }
}

/// Terminal stand-in for a vibration motor: rings the bell once per pulse.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        TerminalBell { out }
    }
}

impl<W: Write> Feedback for TerminalBell<W> {
    fn pulse(&mut self, _duration: Duration) -> Result<(), FeedbackError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}
