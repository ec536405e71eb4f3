//! Tiered detection with fallback

use frame_source::VideoFrame;
use tracing::{debug, warn};

use crate::{DetectorBackend, DetectorConfig, TierId};

/// Outcome of one strategy chain run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetectionSample {
    /// Tier that produced the detections, `None` when every tier came back empty
    pub tier_used: Option<TierId>,
    /// Number of faces reported by that tier
    pub raw_count: u32,
}

impl DetectionSample {
    /// Sample for a tier that found `count` faces
    pub fn hit(tier: TierId, count: usize) -> Self {
        Self {
            tier_used: Some(tier),
            raw_count: u32::try_from(count).unwrap_or(u32::MAX),
        }
    }

    /// Sample for an exhausted chain
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Ordered list of detector tiers sharing one backend
pub struct StrategyChain<B> {
    tiers: Vec<DetectorConfig>,
    backend: B,
}

impl<B: DetectorBackend> StrategyChain<B> {
    /// Create a chain that tries `tiers` in order
    pub fn new(tiers: Vec<DetectorConfig>, backend: B) -> Self {
        Self { tiers, backend }
    }

    /// Configured tiers, in priority order
    pub fn tiers(&self) -> &[DetectorConfig] {
        &self.tiers
    }

    /// Underlying detector backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the tiers against `frame` until one finds a face.
    ///
    /// Never fails: a tier that errors is logged and skipped.
    pub async fn run(&self, frame: VideoFrame) -> DetectionSample {
        for tier in &self.tiers {
            match self.backend.detect(&frame, tier).await {
                Ok(detections) if !detections.is_empty() => {
                    debug!(
                        "Tier {} found {} face(s) in frame {}",
                        tier.tier,
                        detections.len(),
                        frame.sequence
                    );
                    return DetectionSample::hit(tier.tier.clone(), detections.len());
                }
                Ok(_) => {
                    debug!("Tier {} found nothing in frame {}", tier.tier, frame.sequence);
                }
                Err(e) => {
                    warn!("Tier {} failed on frame {}: {}", tier.tier, frame.sequence, e);
                }
            }
        }

        debug!("All {} tiers empty for frame {}", self.tiers.len(), frame.sequence);
        DetectionSample::empty()
    }
}
