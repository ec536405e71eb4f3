//! Face Detection Strategy Chain
//!
//! Turns a video frame into a subject count using an ordered list of
//! detector tiers:
//! - Tiers run from most precise to most permissive
//! - The first tier that finds anything wins
//! - Backend failures fall through to the next tier

pub mod backend;
pub mod chain;
pub mod config;

pub use backend::{Detection, DetectorBackend};
pub use chain::{DetectionSample, StrategyChain};
pub use config::{default_tiers, DetectorConfig, TierId};

use thiserror::Error;

/// Detection error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}
