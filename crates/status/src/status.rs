//! Presence status values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse presence status reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Exactly one subject in view
    #[default]
    Normal,

    /// Subject lost, waiting for them to return
    Pause,

    /// Subject did not return before the pause timed out
    Fail,

    /// Video source could not be acquired
    Error,
}

impl Status {
    /// Lowercase name used in logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Pause => "pause",
            Status::Fail => "fail",
            Status::Error => "error",
        }
    }

    /// `Fail` and `Error` end the session until it is restarted
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Fail | Status::Error)
    }

    /// Message to show the user, `None` while everything is normal
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Status::Normal => None,
            Status::Pause => Some("Learner left the camera view, the lesson is paused"),
            Status::Fail => Some("Pause timed out, the lesson has failed"),
            Status::Error => Some("No camera detected or the camera failed to open"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
