//! Status state machine

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::Status;

/// Time allowed in `Pause` before escalating to `Fail`
pub const DEFAULT_PAUSE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Single-slot pause deadline. Arming replaces any previous deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseTimer {
    deadline: Option<Instant>,
}

impl PauseTimer {
    /// Arm the timer to fire at `deadline`
    pub fn arm(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Disarm the timer, returning whether it was live
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// When the timer fires, if armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Armed and at or past its deadline
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// Edge-triggered presence state machine.
///
/// Every input returns `Some(status)` only when the status actually
/// changed; the caller forwards exactly those values to the notifier.
/// The machine never reads the clock itself: callers pass `now`, and
/// poll [`deadline`](Self::deadline) to know when to call
/// [`on_deadline`](Self::on_deadline).
#[derive(Debug, Clone)]
pub struct StatusStateMachine {
    status: Status,
    pause_timeout: Duration,
    timer: PauseTimer,
}

impl StatusStateMachine {
    /// Create a machine in `Normal` with the given pause timeout
    pub fn new(pause_timeout: Duration) -> Self {
        Self {
            status: Status::Normal,
            pause_timeout,
            timer: PauseTimer::default(),
        }
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Configured pause timeout
    pub fn pause_timeout(&self) -> Duration {
        self.pause_timeout
    }

    /// Pending pause deadline, if in `Pause`
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Feed one smoothed count observed at `now`
    pub fn on_sample(&mut self, smoothed_count: u32, now: Instant) -> Option<Status> {
        let attentive = smoothed_count == 1;

        match self.status {
            Status::Normal if attentive => None,
            Status::Normal => {
                debug!("Attention lost: count={}", smoothed_count);
                self.timer.arm(now + self.pause_timeout);
                self.transition(Status::Pause)
            }
            Status::Pause => {
                // A sample landing on or after the deadline does not rescue the session
                if let Some(status) = self.on_deadline(now) {
                    return Some(status);
                }
                if attentive {
                    self.timer.cancel();
                    self.transition(Status::Normal)
                } else {
                    None
                }
            }
            Status::Fail | Status::Error => None,
        }
    }

    /// Fire the pause timer if it is due at `now`
    pub fn on_deadline(&mut self, now: Instant) -> Option<Status> {
        if self.status != Status::Pause || !self.timer.is_due(now) {
            return None;
        }
        self.timer.cancel();
        warn!("Pause exceeded {:?}, escalating", self.pause_timeout);
        self.transition(Status::Fail)
    }

    /// Video source failed: move to `Error` from any other state
    pub fn report_error(&mut self) -> Option<Status> {
        if self.status == Status::Error {
            return None;
        }
        self.timer.cancel();
        self.transition(Status::Error)
    }

    /// Whether the session has ended
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Back to `Normal` with no timer, for a new session
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.status = Status::Normal;
    }

    fn transition(&mut self, next: Status) -> Option<Status> {
        if next == self.status {
            return None;
        }
        info!("Status {} -> {}", self.status, next);
        self.status = next;
        Some(next)
    }
}

impl Default for StatusStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_PAUSE_TIMEOUT)
    }
}
