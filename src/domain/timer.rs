use chrono::{DateTime, Local};

/// Start/stop timer for a single work session.
///
/// Only the wall-clock start is recorded; the elapsed label is derived from it
/// on every tick, and the integer-second delta is handed back on stop so the
/// caller can add it to the task's accumulated total.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    started_at: Option<DateTime<Local>>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    /// Start the timer now
    pub fn start(&mut self) {
        self.start_at(Local::now());
    }

    /// Start the timer at a given instant (restarting discards the old start)
    pub fn start_at(&mut self, now: DateTime<Local>) {
        self.started_at = Some(now);
    }

    /// Whole seconds elapsed so far (for the ticking label)
    pub fn elapsed(&self) -> u64 {
        self.elapsed_at(Local::now())
    }

    /// Whole seconds between start and `now`; 0 when idle or if the clock went backwards
    pub fn elapsed_at(&self, now: DateTime<Local>) -> u64 {
        self.started_at
            .map(|started| now.signed_duration_since(started).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    /// Stop the timer now and return the session length in seconds
    pub fn stop(&mut self) -> Option<u64> {
        self.stop_at(Local::now())
    }

    /// Stop the timer at `now`; None if it wasn't running
    pub fn stop_at(&mut self, now: DateTime<Local>) -> Option<u64> {
        let elapsed = self.elapsed_at(now);
        self.started_at.take().map(|_| elapsed)
    }
}
