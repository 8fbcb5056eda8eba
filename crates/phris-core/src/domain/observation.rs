//! Per-frame input handed over by the tracking and pose collaborators.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{BoundingBox, EntityId};

/// A confirmed track from the upstream tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedBox {
    /// Tracker-assigned identity
    pub id: EntityId,
    /// Current bounding box
    pub bbox: BoundingBox,
}

impl TrackedBox {
    /// Create a tracked box
    pub fn new(id: impl Into<EntityId>, bbox: BoundingBox) -> Self {
        Self { id: id.into(), bbox }
    }
}

/// Body posture classified by the pose collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Posture {
    /// Upright
    #[default]
    Standing,
    /// Bent over, risky near machinery
    Bending,
    /// On the ground
    Lying,
    /// Kneeling
    Kneeling,
    /// Keypoints missing or unusable
    Unknown,
}

impl Posture {
    /// Risk the pose collaborator publishes for this posture
    pub fn default_risk(&self) -> u8 {
        match self {
            Posture::Standing => 0,
            Posture::Bending => 25,
            Posture::Lying => 50,
            Posture::Kneeling => 15,
            Posture::Unknown => 0,
        }
    }
}

impl std::fmt::Display for Posture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Posture::Standing => "STANDING",
            Posture::Bending => "BENDING",
            Posture::Lying => "LYING",
            Posture::Kneeling => "KNEELING",
            Posture::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One posture reading from the pose collaborator.
///
/// Readings tagged with `entity` are matched to tracks by identity. Untagged
/// readings are matched positionally: the i-th reading belongs to the i-th
/// track of the same frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoseReading {
    /// Classified posture
    pub posture: Posture,
    /// Explicit posture risk; falls back to [`Posture::default_risk`]
    #[serde(default)]
    pub risk: Option<u8>,
    /// Identity this reading belongs to, when the collaborator knows it
    #[serde(default)]
    pub entity: Option<EntityId>,
}

impl PoseReading {
    /// Untagged reading with the posture's default risk
    pub fn new(posture: Posture) -> Self {
        Self {
            posture,
            risk: None,
            entity: None,
        }
    }

    /// Override the posture risk
    pub fn with_risk(mut self, risk: u8) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Tag the reading with an identity
    pub fn for_entity(mut self, id: impl Into<EntityId>) -> Self {
        self.entity = Some(id.into());
        self
    }

    /// Effective posture risk
    pub fn risk(&self) -> u8 {
        self.risk.unwrap_or_else(|| self.posture.default_risk())
    }
}

/// Everything the engine receives for one video frame.
///
/// Empty `tracks` is a normal frame with nobody in view.
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// Frame capture time
    pub timestamp: Instant,
    /// Confirmed tracks in tracker order
    pub tracks: Vec<TrackedBox>,
    /// Pose readings, tagged or in tracker order
    pub poses: Vec<PoseReading>,
}

impl FrameInput {
    /// A frame with tracks and no pose readings
    pub fn new(timestamp: Instant, tracks: Vec<TrackedBox>) -> Self {
        Self {
            timestamp,
            tracks,
            poses: Vec::new(),
        }
    }

    /// Attach pose readings
    pub fn with_poses(mut self, poses: Vec<PoseReading>) -> Self {
        self.poses = poses;
        self
    }

    /// A frame with nobody in view
    pub fn empty(timestamp: Instant) -> Self {
        Self::new(timestamp, Vec::new())
    }
}
