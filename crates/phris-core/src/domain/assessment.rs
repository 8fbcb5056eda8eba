//! Risk assessment value objects produced once per person per frame.

use serde::{Deserialize, Serialize};

/// Upper bound of the total risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Display color as a BGR triple, the channel order video overlays expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayColor(pub [u8; 3]);

impl DisplayColor {
    /// Green
    pub const GREEN: DisplayColor = DisplayColor([0, 255, 0]);
    /// Yellow
    pub const YELLOW: DisplayColor = DisplayColor([0, 255, 255]);
    /// Orange
    pub const ORANGE: DisplayColor = DisplayColor([0, 165, 255]);
    /// Red
    pub const RED: DisplayColor = DisplayColor([0, 0, 255]);

    /// Blue channel
    pub fn b(&self) -> u8 {
        self.0[0]
    }

    /// Green channel
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    /// Red channel
    pub fn r(&self) -> u8 {
        self.0[2]
    }
}

/// Risk factors in their fixed evaluation and display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactorKind {
    /// Base risk of the occupied danger zone
    Zone,
    /// Continuous time spent inside a danger zone
    DwellTime,
    /// Movement speed
    Speed,
    /// Body posture reported by the pose collaborator
    Posture,
    /// Closeness to the frame edge while inside a zone
    Proximity,
    /// Sudden speed increase
    Acceleration,
}

impl FactorKind {
    /// All factors in evaluation order
    pub const ALL: [FactorKind; 6] = [
        FactorKind::Zone,
        FactorKind::DwellTime,
        FactorKind::Speed,
        FactorKind::Posture,
        FactorKind::Proximity,
        FactorKind::Acceleration,
    ];

    /// Maximum contribution of this factor
    pub fn cap(&self) -> u8 {
        match self {
            FactorKind::Zone => 40,
            FactorKind::DwellTime => 20,
            FactorKind::Speed => 20,
            FactorKind::Posture => 20,
            FactorKind::Proximity => 10,
            FactorKind::Acceleration => 10,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            FactorKind::Zone => "Zone",
            FactorKind::DwellTime => "DwellTime",
            FactorKind::Speed => "Speed",
            FactorKind::Posture => "Posture",
            FactorKind::Proximity => "Proximity",
            FactorKind::Acceleration => "Acceleration",
        }
    }
}

impl std::fmt::Display for FactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single nonzero contribution to a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Which factor
    pub kind: FactorKind,
    /// Points contributed
    pub points: u8,
}

/// Short-window direction of a person's recent scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    /// Newest score more than 10 above the oldest in the window
    Increasing,
    /// Newest score more than 10 below the oldest in the window
    Decreasing,
    /// Anything else, including windows shorter than three samples
    Stable,
}

impl Trend {
    /// Number of scores examined
    pub const WINDOW: usize = 3;

    /// Minimum change between oldest and newest score to count as a trend
    pub const MARGIN: i16 = 10;

    /// Classify a window of scores ordered oldest first.
    pub fn from_window(scores: &[u8]) -> Self {
        if scores.len() < Self::WINDOW {
            return Trend::Stable;
        }
        let window = &scores[scores.len() - Self::WINDOW..];
        let oldest = i16::from(window[0]);
        let newest = i16::from(window[Self::WINDOW - 1]);
        if newest > oldest + Self::MARGIN {
            Trend::Increasing
        } else if newest < oldest - Self::MARGIN {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    /// Arrow glyph for overlays
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Increasing => "↑",
            Trend::Decreasing => "↓",
            Trend::Stable => "→",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Increasing => write!(f, "{} INCREASING", self.arrow()),
            Trend::Decreasing => write!(f, "{} DECREASING", self.arrow()),
            Trend::Stable => write!(f, "{} STABLE", self.arrow()),
        }
    }
}

/// Status band of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    /// Score below 30
    Safe,
    /// Score from 30 up to but excluding 60
    Warning,
    /// Score of 60 or more
    Critical,
}

impl RiskStatus {
    /// Lowest score classified as WARNING
    pub const WARNING_FROM: u8 = 30;
    /// Lowest score classified as CRITICAL
    pub const CRITICAL_FROM: u8 = 60;

    /// Classify a score
    pub fn from_score(score: u8) -> Self {
        if score < Self::WARNING_FROM {
            RiskStatus::Safe
        } else if score < Self::CRITICAL_FROM {
            RiskStatus::Warning
        } else {
            RiskStatus::Critical
        }
    }

    /// Overlay color for this status
    pub fn color(&self) -> DisplayColor {
        match self {
            RiskStatus::Safe => DisplayColor::GREEN,
            RiskStatus::Warning => DisplayColor::YELLOW,
            RiskStatus::Critical => DisplayColor::RED,
        }
    }

    /// Color name for textual outputs
    pub fn color_name(&self) -> &'static str {
        match self {
            RiskStatus::Safe => "green",
            RiskStatus::Warning => "yellow",
            RiskStatus::Critical => "red",
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskStatus::Safe => write!(f, "SAFE"),
            RiskStatus::Warning => write!(f, "WARNING"),
            RiskStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome of scoring one person in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Total score in `[0, 100]`
    pub score: u8,
    /// Nonzero contributions in evaluation order; they sum to `score`
    pub factors: Vec<RiskFactor>,
    /// Direction of the recent scores
    pub trend: Trend,
    /// Status band
    pub status: RiskStatus,
    /// Zone label at the time of scoring
    pub zone: String,
    /// Overlay color of the status band
    pub color: DisplayColor,
}

impl RiskAssessment {
    /// Points contributed by one factor, if it contributed any
    pub fn factor(&self, kind: FactorKind) -> Option<u8> {
        self.factors.iter().find(|f| f.kind == kind).map(|f| f.points)
    }

    /// Sum of all listed factor points
    pub fn factor_sum(&self) -> u32 {
        self.factors.iter().map(|f| u32::from(f.points)).sum()
    }

    /// True when the status band is CRITICAL
    pub fn is_critical(&self) -> bool {
        self.status == RiskStatus::Critical
    }
}
