//! Threshold bands mapping a measured value to factor points.

use serde::{Deserialize, Serialize};

/// Awards `points` when the measured value is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Exclusive lower threshold
    pub above: f64,
    /// Points awarded
    pub points: u8,
}

impl ScoreBand {
    /// Create a band
    pub const fn new(above: f64, points: u8) -> Self {
        Self { above, points }
    }
}

/// Set of bands; the band with the highest threshold exceeded wins.
///
/// Declaration order does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBands(Vec<ScoreBand>);

impl ScoreBands {
    /// Create a band set
    pub fn new(bands: Vec<ScoreBand>) -> Self {
        Self(bands)
    }

    /// Speed bands in px/s: >200 → 20, >100 → 15, >50 → 10, >20 → 5
    pub fn default_speed() -> Self {
        Self(vec![
            ScoreBand::new(200.0, 20),
            ScoreBand::new(100.0, 15),
            ScoreBand::new(50.0, 10),
            ScoreBand::new(20.0, 5),
        ])
    }

    /// Dwell bands in seconds: >5 → 20, >3 → 15, >1 → 10
    pub fn default_dwell() -> Self {
        Self(vec![
            ScoreBand::new(5.0, 20),
            ScoreBand::new(3.0, 15),
            ScoreBand::new(1.0, 10),
        ])
    }

    /// Acceleration bands in px/s per frame step: >50 → 10, >25 → 5
    pub fn default_acceleration() -> Self {
        Self(vec![ScoreBand::new(50.0, 10), ScoreBand::new(25.0, 5)])
    }

    /// Points for a measured value; 0 when no band is exceeded or the value is NaN
    pub fn score(&self, value: f64) -> u8 {
        self.0
            .iter()
            .filter(|band| value > band.above)
            .max_by(|a, b| a.above.total_cmp(&b.above))
            .map(|band| band.points)
            .unwrap_or(0)
    }

    /// The configured bands
    pub fn bands(&self) -> &[ScoreBand] {
        &self.0
    }

    /// True when every threshold is finite
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|band| band.above.is_finite())
    }
}
