//! Frame Source for Presence Monitoring
//!
//! Describes the video feed consumed by the monitor:
//! - Decoded frames handed to the detector backend
//! - Media readiness (playing, buffered, dimensions known)
//! - A manually driven source for hosts and tests

pub mod frame;
pub mod manual;
pub mod state;

pub use frame::VideoFrame;
pub use manual::ManualSource;
pub use state::{ReadyState, SourceState};

use thiserror::Error;

/// Video source error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("No camera device available")]
    NoDevice,

    #[error("Camera access denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Streaming error: {0}")]
    Stream(String),
}

/// A live video feed the monitor samples from.
///
/// Acquisition failures are not reported through this trait; the host
/// forwards them to the monitor out-of-band.
pub trait FrameSource: Send + Sync + 'static {
    /// Whether the current frame can be decoded (playing, buffered, sized)
    fn is_ready(&self) -> bool;

    /// Snapshot of the frame currently on screen
    fn current_frame(&self) -> Option<VideoFrame>;
}
