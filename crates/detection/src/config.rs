//! Detector tier configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a detector tier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(pub String);

impl TierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TierId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One fallback tier of the strategy chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Tier name, reported in logs when the tier succeeds
    #[serde(rename = "id")]
    pub tier: TierId,

    /// Detector input resolution (pixels, multiple of 32)
    pub input_size: u32,

    /// Minimum detection score to keep a face (0-1)
    pub score_threshold: f32,
}

impl DetectorConfig {
    pub fn new(tier: impl Into<TierId>, input_size: u32, score_threshold: f32) -> Self {
        Self {
            tier: tier.into(),
            input_size,
            score_threshold,
        }
    }
}

/// Default tier list, most precise first.
///
/// Each step trades precision for recall: a larger input surface picks up
/// smaller faces, a lower threshold keeps weaker ones.
pub fn default_tiers() -> Vec<DetectorConfig> {
    vec![
        DetectorConfig::new("precise", 224, 0.5),
        DetectorConfig::new("balanced", 320, 0.4),
        DetectorConfig::new("permissive", 416, 0.3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers_get_more_permissive() {
        let tiers = default_tiers();
        assert_eq!(tiers.len(), 3);

        for pair in tiers.windows(2) {
            assert!(pair[1].input_size > pair[0].input_size);
            assert!(pair[1].score_threshold < pair[0].score_threshold);
        }
    }

    #[test]
    fn test_tier_id_display() {
        assert_eq!(TierId::from("balanced").to_string(), "balanced");
    }
}
