//! Multi-factor risk scoring.
//!
//! Six factors are evaluated in a fixed order (zone, dwell time, speed,
//! posture, proximity, acceleration), each capped at its own maximum. The
//! total is clamped to 100; when the raw sum overflows, the excess is taken
//! off the trailing factors so the reported breakdown always sums to the
//! score.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::ScoreBands;
use crate::domain::{
    EntityProfile, FactorKind, Point, Posture, RiskAssessment, RiskFactor, RiskStatus, Trend,
    ZoneMatch, MAX_RISK_SCORE,
};
use crate::tracking::KinematicsEstimator;

/// Thresholds used by [`RiskScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Speed bands in px/s
    pub speed_bands: ScoreBands,
    /// Dwell-time bands in seconds
    pub dwell_bands: ScoreBands,
    /// Acceleration bands in px/s
    pub acceleration_bands: ScoreBands,
    /// Distance from either frame edge that counts as close (pixels, default: 100)
    pub proximity_margin: f64,
    /// Frame width in pixels (default: 1280)
    pub frame_width: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            speed_bands: ScoreBands::default_speed(),
            dwell_bands: ScoreBands::default_dwell(),
            acceleration_bands: ScoreBands::default_acceleration(),
            proximity_margin: 100.0,
            frame_width: 1280.0,
        }
    }
}

/// Per-person inputs for one scoring pass
#[derive(Debug, Clone)]
pub struct ScoringInput {
    /// Current position
    pub position: Point,
    /// Zone classification of the position
    pub zone: ZoneMatch,
    /// Current speed in px/s
    pub speed: f64,
    /// Current posture
    pub posture: Posture,
    /// Posture risk reported by the pose collaborator
    pub posture_risk: u8,
}

/// Computes risk assessments and records them on the profile.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    /// Create a scorer
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scorer configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one person at `now`.
    ///
    /// Side effects on `profile`: starts or clears the dwell timer, and
    /// appends the speed, score and zone label to their histories. The
    /// acceleration lookback is read before the new speed is stored.
    pub fn calculate(
        &self,
        profile: &mut EntityProfile,
        input: &ScoringInput,
        now: Instant,
    ) -> RiskAssessment {
        let in_zone = input.zone.in_zone;

        let zone_points = if in_zone { input.zone.base_risk } else { 0 };

        let dwell_points = if in_zone {
            profile.enter_zone(now);
            let elapsed = profile.dwell_elapsed(now).as_secs_f64();
            self.config.dwell_bands.score(elapsed)
        } else {
            profile.leave_zone();
            0
        };

        let speed_points = self.config.speed_bands.score(input.speed);

        let posture_points = input.posture_risk;

        let proximity_points = if in_zone && self.near_frame_edge(input.position) {
            FactorKind::Proximity.cap()
        } else {
            0
        };

        let acceleration = KinematicsEstimator::acceleration(profile, input.speed);
        let acceleration_points = self.config.acceleration_bands.score(acceleration);

        let raw = [
            (FactorKind::Zone, zone_points),
            (FactorKind::DwellTime, dwell_points),
            (FactorKind::Speed, speed_points),
            (FactorKind::Posture, posture_points),
            (FactorKind::Proximity, proximity_points),
            (FactorKind::Acceleration, acceleration_points),
        ];

        let mut budget = MAX_RISK_SCORE;
        let mut factors = Vec::with_capacity(raw.len());
        for (kind, points) in raw {
            let granted = points.min(kind.cap()).min(budget);
            if granted > 0 {
                budget -= granted;
                factors.push(RiskFactor { kind, points: granted });
            }
        }
        let score = MAX_RISK_SCORE - budget;

        profile.record_assessment(&input.zone.zone_name, input.speed, score, now);

        let trend = Trend::from_window(&profile.scores().recent(Trend::WINDOW));
        let status = RiskStatus::from_score(score);

        tracing::debug!(
            entity = %profile.id(),
            score,
            status = %status,
            zone = %input.zone.zone_name,
            "Risk assessed"
        );

        RiskAssessment {
            score,
            factors,
            trend,
            status,
            zone: input.zone.zone_name.clone(),
            color: status.color(),
        }
    }

    fn near_frame_edge(&self, position: Point) -> bool {
        let margin = self.config.proximity_margin;
        position.x < margin || position.x > self.config.frame_width - margin
    }
}
