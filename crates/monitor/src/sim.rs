//! Scripted detector backend for demos and soak runs

use detection::{Detection, DetectionError, DetectorBackend, DetectorConfig, TierId};
use frame_source::VideoFrame;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Faces in view per frame, replayed in a loop
    pub script: Vec<u32>,

    /// Time each detector call takes (milliseconds)
    pub latency_ms: u64,

    /// Tiers that always fail, to exercise the fallback
    pub failing_tiers: Vec<TierId>,

    /// How long the demo runs before stopping (milliseconds)
    pub run_for_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        // Present, a dropout, present, then gone for good
        let mut script = vec![1, 1, 1, 0, 1, 1];
        script.extend(std::iter::repeat(0).take(30));
        Self {
            script,
            latency_ms: 150,
            failing_tiers: vec![TierId::from("precise")],
            run_for_ms: 60_000,
        }
    }
}

/// Backend that replays a face-count script keyed by frame sequence
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    config: SimulationConfig,
}

impl SimulatedBackend {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Faces scripted for the frame with this sequence number
    pub fn faces_for(&self, sequence: u64) -> u32 {
        if self.config.script.is_empty() {
            return 0;
        }
        let index = sequence.saturating_sub(1) % self.config.script.len() as u64;
        self.config.script[index as usize]
    }
}

impl DetectorBackend for SimulatedBackend {
    async fn detect(
        &self,
        frame: &VideoFrame,
        config: &DetectorConfig,
    ) -> Result<Vec<Detection>, DetectionError> {
        tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;

        if self.config.failing_tiers.contains(&config.tier) {
            return Err(DetectionError::ModelNotLoaded(config.tier.to_string()));
        }

        let faces = self.faces_for(frame.sequence);
        trace!("Frame {} on tier {}: {} face(s)", frame.sequence, config.tier, faces);

        let (width, height) = frame.dimensions();
        let side = width.min(height) as f32 / 3.0;
        Ok((0..faces)
            .map(|i| Detection::new(side * i as f32, side, side, side, 0.9))
            .collect())
    }
}
