//! # PHRIS core
//!
//! Stateful risk engine for video-based site safety monitoring.
//!
//! Upstream collaborators detect people, track them across frames and classify
//! their posture. This crate turns those per-frame observations into a 0-100
//! risk score per person, a short-term trend, and a throttled critical-alert
//! signal.
//!
//! ## Features
//!
//! - **Zone Classification**: ordered danger-zone polygons, first match wins
//! - **Rolling Profiles**: bounded position, speed, score and zone history per person
//! - **Multi-factor Scoring**: zone, dwell time, speed, posture, edge proximity, acceleration
//! - **Alert Throttling**: at most one critical alert per cooldown window
//! - **Lifecycle Management**: eviction of people the tracker has dropped
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     FramePipeline                      │
//! ├────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌────────────────┐   │
//! │  │ ZoneIndex │  │ Kinematics   │  │  RiskScorer    │   │
//! │  └─────┬─────┘  └──────┬───────┘  └───────┬────────┘   │
//! │        └───────────────┼──────────────────┘            │
//! │              ┌─────────▼──────────┐                    │
//! │              │ EntityProfileStore │                    │
//! │              └─────────┬──────────┘                    │
//! │        ┌───────────────┴──────────────┐                │
//! │  ┌─────▼────────┐            ┌────────▼────────┐       │
//! │  │ AlertThrottle│            │ LifecycleReaper │       │
//! │  └──────────────┘            └─────────────────┘       │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use phris_core::{
//!     BoundingBox, EngineConfig, FrameInput, FramePipeline, RiskError, RiskStatus, TrackedBox,
//! };
//!
//! let mut pipeline = FramePipeline::new(EngineConfig::default())?;
//! let t0 = Instant::now();
//!
//! // Standing still inside HEAVY_MACHINERY for six seconds
//! let mut report = None;
//! for second in 0..=6 {
//!     let frame = FrameInput::new(
//!         t0 + Duration::from_secs(second),
//!         vec![TrackedBox::new("worker-1", BoundingBox::new(350, 450, 450, 550))],
//!     );
//!     report = Some(pipeline.process_frame(frame));
//! }
//!
//! let report = report.unwrap();
//! let worker = &report.entities[0];
//! assert_eq!(worker.assessment.score, 60);
//! assert_eq!(worker.assessment.status, RiskStatus::Critical);
//! # Ok::<(), RiskError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod alerting;
pub mod config;
pub mod domain;
pub mod pipeline;
pub mod scoring;
pub mod tracking;

// Re-export main types
pub use domain::{
    assessment::{DisplayColor, FactorKind, RiskAssessment, RiskFactor, RiskStatus, Trend},
    geometry::{BoundingBox, Point},
    observation::{FrameInput, PoseReading, Posture, TrackedBox},
    profile::{BoundedHistory, EntityId, EntityProfile},
    zone::{Zone, ZoneIndex, ZoneMatch, ZoneSpec, SAFE_ZONE_LABEL},
};

pub use alerting::{AlertConfig, AlertDecision, AlertEvent, AlertId, AlertThrottle, CriticalEntity};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use pipeline::{EntityReport, FramePipeline, FrameReport, SessionStats};
pub use scoring::{RiskScorer, ScoreBand, ScoreBands, ScoringConfig, ScoringInput};
pub use tracking::{EntityProfileStore, KinematicsEstimator, LifecycleConfig, LifecycleReaper};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for engine operations
pub type Result<T> = std::result::Result<T, RiskError>;

/// Unified error type for the risk engine.
///
/// Only configuration loading fails; per-frame processing never returns
/// errors.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Zone polygon rejected at load
    #[error("Invalid geometry for zone '{zone}': {reason}")]
    InvalidGeometry {
        /// Zone name
        zone: String,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EngineConfig, EngineConfigBuilder, FramePipeline, FrameReport, EntityReport,
        SessionStats, RiskError, Result,
        // Domain types
        BoundingBox, Point, EntityId, FrameInput, TrackedBox, PoseReading, Posture,
        RiskAssessment, RiskFactor, FactorKind, RiskStatus, Trend,
        Zone, ZoneIndex, ZoneSpec, ZoneMatch,
        // Scoring and tracking
        RiskScorer, ScoringConfig, EntityProfileStore, KinematicsEstimator, LifecycleReaper,
        // Alerting
        AlertThrottle, AlertEvent, CriticalEntity,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = RiskError::InvalidGeometry {
            zone: "PRESS".into(),
            reason: "needs at least 3 vertices, got 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid geometry for zone 'PRESS': needs at least 3 vertices, got 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "site.json");
        let err: RiskError = io.into();
        assert!(matches!(err, RiskError::Io(_)));
    }
}
