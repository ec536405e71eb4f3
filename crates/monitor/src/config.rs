//! Monitor configuration

use detection::{default_tiers, DetectorConfig, TierId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PRESENCE";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("No detector tiers configured")]
    NoTiers,

    #[error("Duplicate tier id: {0}")]
    DuplicateTier(TierId),

    #[error("Tier {tier}: input size {size} must be a positive multiple of 32")]
    InputSize { tier: TierId, size: u32 },

    #[error("Tier {tier}: score threshold {threshold} must be between 0 and 1")]
    ScoreThreshold { tier: TierId, threshold: f32 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("Unknown log level: {0}")]
    LogLevel(String),
}

/// Presence monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sampling period (milliseconds)
    pub tick_interval_ms: u64,

    /// Time allowed in pause before failing (milliseconds)
    pub pause_timeout_ms: u64,

    /// Number of raw counts kept for smoothing
    pub history_capacity: usize,

    /// Detector tiers, most precise first
    pub tiers: Vec<DetectorConfig>,

    /// Log level for the binary (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            pause_timeout_ms: 10_000,
            history_capacity: sample_history::DEFAULT_CAPACITY,
            tiers: default_tiers(),
            log_level: "info".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Shorter pause allowance
    pub fn strict() -> Self {
        Self {
            pause_timeout_ms: 5_000,
            ..Default::default()
        }
    }

    /// Longer pause allowance
    pub fn lenient() -> Self {
        Self {
            pause_timeout_ms: 20_000,
            ..Default::default()
        }
    }

    /// Load from an optional file plus `PRESENCE__*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = load_settings(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn pause_timeout(&self) -> Duration {
        Duration::from_millis(self.pause_timeout_ms)
    }

    /// Parsed log level
    pub fn level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Check timings and the tier list
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Zero("tick_interval_ms"));
        }
        if self.pause_timeout_ms == 0 {
            return Err(ConfigError::Zero("pause_timeout_ms"));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Zero("history_capacity"));
        }
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }

        let mut seen = HashSet::new();
        for tier in &self.tiers {
            if !seen.insert(&tier.tier) {
                return Err(ConfigError::DuplicateTier(tier.tier.clone()));
            }
            if tier.input_size == 0 || tier.input_size % 32 != 0 {
                return Err(ConfigError::InputSize {
                    tier: tier.tier.clone(),
                    size: tier.input_size,
                });
            }
            if !(tier.score_threshold > 0.0 && tier.score_threshold < 1.0) {
                return Err(ConfigError::ScoreThreshold {
                    tier: tier.tier.clone(),
                    threshold: tier.score_threshold,
                });
            }
        }

        self.level()?;
        Ok(())
    }
}

/// Deserialize settings from an optional file and the environment.
///
/// Environment variables use the `PRESENCE` prefix with `__` between
/// nested keys. Keys are relative to `T`: for [`MonitorConfig::load`] the
/// pause timeout is `PRESENCE__PAUSE_TIMEOUT_MS=5000`; the demo binary nests
/// it under `monitor`, so there it is `PRESENCE__MONITOR__PAUSE_TIMEOUT_MS`.
pub fn load_settings<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    Ok(builder.build()?.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_matches_constants() {
        let config = MonitorConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(1000));
        assert_eq!(config.pause_timeout(), Duration::from_millis(10_000));
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.tiers.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert!(MonitorConfig::strict().pause_timeout_ms < MonitorConfig::default().pause_timeout_ms);
        assert!(MonitorConfig::lenient().pause_timeout_ms > MonitorConfig::default().pause_timeout_ms);
    }

    #[test]
    fn test_rejects_empty_tiers() {
        let config = MonitorConfig {
            tiers: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoTiers)));
    }

    #[test]
    fn test_rejects_duplicate_tier() {
        let config = MonitorConfig {
            tiers: vec![
                DetectorConfig::new("a", 224, 0.5),
                DetectorConfig::new("a", 320, 0.4),
            ],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateTier(_))));
    }

    #[test]
    fn test_rejects_bad_tier_values() {
        let odd_size = MonitorConfig {
            tiers: vec![DetectorConfig::new("a", 300, 0.5)],
            ..Default::default()
        };
        assert!(matches!(odd_size.validate(), Err(ConfigError::InputSize { size: 300, .. })));

        let bad_threshold = MonitorConfig {
            tiers: vec![DetectorConfig::new("a", 320, 1.5)],
            ..Default::default()
        };
        assert!(matches!(bad_threshold.validate(), Err(ConfigError::ScoreThreshold { .. })));
    }

    #[test]
    fn test_rejects_zero_timings() {
        let config = MonitorConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Zero("tick_interval_ms"))));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let config = MonitorConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::LogLevel(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("presence-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
pause_timeout_ms = 4000

[[tiers]]
id = "only"
input_size = 320
score_threshold = 0.45
"#,
        )
        .unwrap();

        let config = MonitorConfig::load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.pause_timeout_ms, 4000);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.tiers.len(), 1);
        assert_eq!(config.tiers[0].tier, TierId::from("only"));
        assert_eq!(config.tiers[0].input_size, 320);
        assert!((config.tiers[0].score_threshold - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_load_nested_settings() {
        #[derive(Deserialize)]
        struct Nested {
            monitor: MonitorConfig,
        }

        let path = std::env::temp_dir().join(format!("presence-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[monitor]\npause_timeout_ms = 5000\n").unwrap();

        let nested: Nested = load_settings(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(nested.monitor.pause_timeout(), Duration::from_millis(5000));
        assert_eq!(nested.monitor.tiers.len(), default_tiers().len());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("presence-does-not-exist.toml");
        assert!(matches!(MonitorConfig::load(Some(&path)), Err(ConfigError::Load(_))));
    }
}
