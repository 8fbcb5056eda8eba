//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alerting::AlertConfig;
use crate::domain::{ZoneIndex, ZoneSpec, DEFAULT_HISTORY_CAPACITY};
use crate::scoring::ScoringConfig;
use crate::tracking::LifecycleConfig;
use crate::{Result, RiskError};

/// Configuration for one monitored stream.
///
/// Every section falls back to its defaults when absent from a file, so a
/// site file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Danger zones in priority order
    pub zones: Vec<ZoneSpec>,
    /// Scoring thresholds
    pub scoring: ScoringConfig,
    /// Alert throttling
    pub alert: AlertConfig,
    /// Stale profile eviction
    pub lifecycle: LifecycleConfig,
    /// Entries kept per profile history (default: 100)
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zones: ZoneSpec::industrial_defaults(),
            scoring: ScoringConfig::default(),
            alert: AlertConfig::default(),
            lifecycle: LifecycleConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse a JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check zone geometry and numeric settings.
    pub fn validate(&self) -> Result<()> {
        ZoneIndex::from_specs(&self.zones)?;

        let scoring = &self.scoring;
        for (name, bands) in [
            ("speed_bands", &scoring.speed_bands),
            ("dwell_bands", &scoring.dwell_bands),
            ("acceleration_bands", &scoring.acceleration_bands),
        ] {
            if !bands.is_valid() {
                return Err(RiskError::Config(format!("{name} thresholds must be finite")));
            }
        }

        if !scoring.proximity_margin.is_finite() || scoring.proximity_margin < 0.0 {
            return Err(RiskError::Config(format!(
                "proximity_margin must be a non-negative number, got {}",
                scoring.proximity_margin
            )));
        }
        if !scoring.frame_width.is_finite() || scoring.frame_width <= 0.0 {
            return Err(RiskError::Config(format!(
                "frame_width must be positive, got {}",
                scoring.frame_width
            )));
        }
        if !self.alert.cooldown_secs.is_finite() || self.alert.cooldown_secs < 0.0 {
            return Err(RiskError::Config(format!(
                "cooldown_secs must be a non-negative number, got {}",
                self.alert.cooldown_secs
            )));
        }
        if !self.lifecycle.max_age_secs.is_finite() || self.lifecycle.max_age_secs < 0.0 {
            return Err(RiskError::Config(format!(
                "max_age_secs must be a non-negative number, got {}",
                self.lifecycle.max_age_secs
            )));
        }
        if self.lifecycle.reap_every_frames == 0 {
            return Err(RiskError::Config("reap_every_frames must be at least 1".into()));
        }
        if self.history_capacity == 0 {
            return Err(RiskError::Config("history_capacity must be at least 1".into()));
        }

        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Replace the zone list
    pub fn zones(mut self, zones: Vec<ZoneSpec>) -> Self {
        self.config.zones = zones;
        self
    }

    /// Append a zone after the existing ones (lowest priority)
    pub fn add_zone(mut self, zone: ZoneSpec) -> Self {
        self.config.zones.push(zone);
        self
    }

    /// Replace the scoring configuration
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Set the frame width in pixels
    pub fn frame_width(mut self, width: f64) -> Self {
        self.config.scoring.frame_width = width.max(1.0);
        self
    }

    /// Set the edge proximity margin in pixels
    pub fn proximity_margin(mut self, margin: f64) -> Self {
        self.config.scoring.proximity_margin = margin.max(0.0);
        self
    }

    /// Set the alert cooldown in seconds
    pub fn alert_cooldown_secs(mut self, secs: f64) -> Self {
        self.config.alert.cooldown_secs = secs.max(0.0);
        self
    }

    /// Set the critical alert score
    pub fn critical_score(mut self, score: u8) -> Self {
        self.config.alert.critical_score = score.min(100);
        self
    }

    /// Set the stale profile max age in seconds
    pub fn max_age_secs(mut self, secs: f64) -> Self {
        self.config.lifecycle.max_age_secs = secs.max(0.0);
        self
    }

    /// Set the reaper cadence in frames
    pub fn reap_every_frames(mut self, frames: u64) -> Self {
        self.config.lifecycle.reap_every_frames = frames.max(1);
        self
    }

    /// Set the per-profile history capacity
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity.max(1);
        self
    }

    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
