//! Presence Status
//!
//! Converts smoothed subject counts into the four-state signal the host
//! acts on, with timeout-based escalation from `Pause` to `Fail`.

mod machine;
mod notifier;
mod status;

pub use machine::{PauseTimer, StatusStateMachine, DEFAULT_PAUSE_TIMEOUT};
pub use notifier::{Notifier, StatusRecorder};
pub use status::Status;
