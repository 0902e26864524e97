use std::time::{Duration, Instant};

/// A periodic deadline owned by whoever drives it.
///
/// Nothing fires on its own: the event loop asks [`Timer::poll`] whether the
/// deadline has passed, which keeps every transition on one thread.
#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    period: Duration,
    next_due: Option<Instant>,
}

impl Timer {
    pub fn new(period: Duration) -> Self {
        Timer {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Restarts the period from `now`. No effect on a cancelled timer.
    pub fn reschedule(&mut self, now: Instant) {
        if self.is_running() {
            self.start(now);
        }
    }

    /// Takes effect from the next reschedule or firing.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Wait left before the next deadline; zero once it has passed.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true once per elapsed deadline and schedules the next one.
    ///
    /// The next deadline counts from the missed one, so a late poll catches up
    /// one period at a time instead of dropping ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }
}
