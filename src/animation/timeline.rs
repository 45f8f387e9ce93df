//! Progress clock advanced by an external tick source.

use std::time::Duration;

// Absorbs float drift from summing many small ticks.
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineStatus {
    /// Stopped at the start.
    Dismissed,
    /// Running from start to end.
    Forward,
    /// Running from end back to start.
    Reverse,
    /// Stopped at the end.
    Completed,
}

impl TimelineStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TimelineStatus::Dismissed | TimelineStatus::Completed)
    }
}

/// A single progress value in `[0, 1]` driven by `tick`.
///
/// Nothing here reads a clock; the host feeds elapsed time so every pass is
/// reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    duration: Duration,
    value: f64,
    status: TimelineStatus,
}

impl Timeline {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            value: 0.0,
            status: TimelineStatus::Dismissed,
        }
    }

    /// Timeline parked at its end, as if it already played once.
    pub fn completed(duration: Duration) -> Self {
        Self {
            duration,
            value: 1.0,
            status: TimelineStatus::Completed,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn status(&self) -> TimelineStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Jump back to the start and stop.
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.status = TimelineStatus::Dismissed;
    }

    /// Play towards the end from the current value. A zero duration
    /// completes immediately.
    pub fn forward(&mut self) {
        if self.duration.is_zero() || self.value >= 1.0 {
            self.value = 1.0;
            self.status = TimelineStatus::Completed;
        } else {
            self.status = TimelineStatus::Forward;
        }
    }

    /// Play towards the start from the current value.
    pub fn reverse(&mut self) {
        if self.duration.is_zero() || self.value <= 0.0 {
            self.value = 0.0;
            self.status = TimelineStatus::Dismissed;
        } else {
            self.status = TimelineStatus::Reverse;
        }
    }

    /// `reset` followed by `forward`; cancels whatever was in flight.
    pub fn restart(&mut self) {
        self.reset();
        self.forward();
    }

    /// Advance by `dt`. Returns the terminal status when this tick reached one.
    pub fn tick(&mut self, dt: Duration) -> Option<TimelineStatus> {
        let step = if self.duration.is_zero() {
            1.0
        } else {
            dt.as_secs_f64() / self.duration.as_secs_f64()
        };

        match self.status {
            TimelineStatus::Forward => {
                self.value = (self.value + step).min(1.0);
                if self.value >= 1.0 - EPSILON {
                    self.value = 1.0;
                    self.status = TimelineStatus::Completed;
                    return Some(TimelineStatus::Completed);
                }
            }
            TimelineStatus::Reverse => {
                self.value = (self.value - step).max(0.0);
                if self.value <= EPSILON {
                    self.value = 0.0;
                    self.status = TimelineStatus::Dismissed;
                    return Some(TimelineStatus::Dismissed);
                }
            }
            TimelineStatus::Dismissed | TimelineStatus::Completed => {}
        }
        None
    }
}
