//! Presence Monitor
//!
//! Samples a live video feed once per tick and reports whether exactly
//! one subject is paying attention:
//! - Tiered face detection with fallback
//! - Smoothing of single-frame dropouts
//! - `Normal` / `Pause` / `Fail` / `Error` status with pause timeout
//!
//! The host owns the camera and the detector model; this crate owns the
//! cadence and the state.

pub mod config;
mod gate;
pub mod monitor;
mod sampler;
pub mod sim;

pub use crate::config::{load_settings, ConfigError, MonitorConfig};
pub use monitor::PresenceMonitor;
pub use sim::{SimulatedBackend, SimulationConfig};

pub use detection::{Detection, DetectionError, DetectorBackend, DetectorConfig, TierId};
pub use frame_source::{FrameSource, ManualSource, SourceError, SourceState, VideoFrame};
pub use status::{Notifier, Status, StatusRecorder};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("No tokio runtime available to run the sampler")]
    NoRuntime,
}

/// Initialize logging at `level`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(level: Level) -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
