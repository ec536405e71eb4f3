//! Detector backend interface

use frame_source::VideoFrame;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::{DetectionError, DetectorConfig};

/// Face found by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Detection score (0-1)
    pub score: f32,
}

impl Detection {
    pub fn new(x: f32, y: f32, width: f32, height: f32, score: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score,
        }
    }
}

/// Face detector the strategy chain delegates to.
///
/// Implementations run one detection pass with the tier's input size and
/// score threshold. They may be slow and may fail; the chain treats a
/// failure as "nothing found" for that tier.
pub trait DetectorBackend: Send + Sync + 'static {
    fn detect(
        &self,
        frame: &VideoFrame,
        config: &DetectorConfig,
    ) -> impl Future<Output = Result<Vec<Detection>, DetectionError>> + Send;
}

impl<B: DetectorBackend> DetectorBackend for Arc<B> {
    fn detect(
        &self,
        frame: &VideoFrame,
        config: &DetectorConfig,
    ) -> impl Future<Output = Result<Vec<Detection>, DetectionError>> + Send {
        (**self).detect(frame, config)
    }
}
