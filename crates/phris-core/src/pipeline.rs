//! Per-stream frame driver.
//!
//! [`FramePipeline`] owns one stream's zone index, profile store and alert
//! state. Frames must be fed in capture order; within a frame, people are
//! scored in parallel on profiles moved out of the store, after which the
//! alert throttle and (on its cadence) the lifecycle reaper run serially.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::alerting::{AlertEvent, AlertThrottle, CriticalEntity};
use crate::config::EngineConfig;
use crate::domain::{
    BoundingBox, EntityId, EntityProfile, FrameInput, Point, PoseReading, Posture,
    RiskAssessment, TrackedBox, ZoneIndex,
};
use crate::scoring::{RiskScorer, ScoringInput};
use crate::tracking::{EntityProfileStore, KinematicsEstimator, LifecycleReaper};
use crate::Result;

/// Result for one person in one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    /// Tracker identity
    pub id: EntityId,
    /// Bounding box as received
    pub bbox: BoundingBox,
    /// Box center used for classification and kinematics
    pub center: Point,
    /// Current speed in px/s
    pub speed: f64,
    /// Posture used for scoring
    pub posture: Posture,
    /// Risk assessment
    pub assessment: RiskAssessment,
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// 1-based frame number within the stream
    pub frame_number: u64,
    /// One report per distinct identity, in tracker order
    pub entities: Vec<EntityReport>,
    /// People above the critical alert score
    pub critical: Vec<CriticalEntity>,
    /// Alert emitted this frame, if any
    pub alert: Option<AlertEvent>,
    /// Profiles evicted this frame when the reaper ran
    pub evicted: Option<usize>,
}

impl FrameReport {
    /// Look up the report for one identity
    pub fn entity(&self, id: &EntityId) -> Option<&EntityReport> {
        self.entities.iter().find(|e| &e.id == id)
    }
}

/// Running statistics for a stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    /// Frames processed
    pub frames: u64,
    /// Alerts emitted
    pub alerts: u64,
    /// Profiles currently held
    pub tracked: usize,
    /// Time between the first and latest frame, in seconds
    pub elapsed_secs: f64,
    /// Average frames per second over the session (0 when no time has passed)
    pub fps: f64,
}

struct ScoringJob {
    track: TrackedBox,
    pose: PoseReading,
    profile: EntityProfile,
}

/// Risk engine for a single video stream.
#[derive(Debug)]
pub struct FramePipeline {
    zones: ZoneIndex,
    store: EntityProfileStore,
    scorer: RiskScorer,
    throttle: AlertThrottle,
    reaper: LifecycleReaper,
    frames: u64,
    first_frame: Option<Instant>,
    last_frame: Option<Instant>,
}

impl FramePipeline {
    /// Build a pipeline from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let zones = ZoneIndex::from_specs(&config.zones)?;

        tracing::info!(
            zones = zones.len(),
            history_capacity = config.history_capacity,
            "Frame pipeline ready"
        );

        Ok(Self {
            zones,
            store: EntityProfileStore::new(config.history_capacity),
            scorer: RiskScorer::new(config.scoring),
            throttle: AlertThrottle::new(config.alert),
            reaper: LifecycleReaper::new(&config.lifecycle),
            frames: 0,
            first_frame: None,
            last_frame: None,
        })
    }

    /// Build a pipeline with the default industrial site configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// Process one frame.
    ///
    /// Never fails: degenerate input yields safe defaults, and an empty frame
    /// simply reports nobody.
    pub fn process_frame(&mut self, frame: FrameInput) -> FrameReport {
        let FrameInput {
            timestamp,
            tracks,
            poses,
        } = frame;

        self.frames += 1;
        self.first_frame.get_or_insert(timestamp);
        self.last_frame = Some(timestamp);

        if !poses.is_empty() && poses.len() != tracks.len() {
            tracing::warn!(
                frame = self.frames,
                tracks = tracks.len(),
                poses = poses.len(),
                "Pose and track counts differ"
            );
        }

        let tagged = tagged_poses(&poses);
        let mut seen = HashSet::with_capacity(tracks.len());
        let mut jobs = Vec::with_capacity(tracks.len());

        for (index, track) in tracks.into_iter().enumerate() {
            if !seen.insert(track.id.clone()) {
                tracing::warn!(
                    frame = self.frames,
                    entity = %track.id,
                    "Duplicate identity in frame, skipping"
                );
                continue;
            }
            let pose = resolve_pose(&track.id, index, &poses, &tagged);
            let profile = self.store.take_or_create(&track.id, timestamp);
            jobs.push(ScoringJob {
                track,
                pose,
                profile,
            });
        }

        let zones = &self.zones;
        let scorer = &self.scorer;
        let entities: Vec<EntityReport> = jobs
            .par_iter_mut()
            .map(|job| score_job(zones, scorer, job, timestamp))
            .collect();

        for job in jobs {
            self.store.restore(job.profile);
        }

        let critical: Vec<CriticalEntity> = entities
            .iter()
            .filter(|e| self.throttle.is_critical(e.assessment.score))
            .map(|e| CriticalEntity {
                id: e.id.clone(),
                score: e.assessment.score,
            })
            .collect();
        let decision = self.throttle.evaluate(critical, timestamp);

        let evicted = if self.reaper.is_due(self.frames) {
            Some(self.reaper.reap(&mut self.store, timestamp))
        } else {
            None
        };

        FrameReport {
            frame_number: self.frames,
            entities,
            critical: decision.critical,
            alert: decision.alert,
            evicted,
        }
    }

    /// Session statistics so far
    pub fn stats(&self) -> SessionStats {
        let elapsed = match (self.first_frame, self.last_frame) {
            (Some(first), Some(last)) => last.saturating_duration_since(first),
            _ => Duration::ZERO,
        };
        let elapsed_secs = elapsed.as_secs_f64();
        let fps = if elapsed_secs > 0.0 {
            self.frames as f64 / elapsed_secs
        } else {
            0.0
        };

        SessionStats {
            frames: self.frames,
            alerts: self.throttle.alert_count(),
            tracked: self.store.len(),
            elapsed_secs,
            fps,
        }
    }

    /// Profile store
    pub fn store(&self) -> &EntityProfileStore {
        &self.store
    }

    /// Zone index
    pub fn zones(&self) -> &ZoneIndex {
        &self.zones
    }

    /// Alert throttle
    pub fn throttle(&self) -> &AlertThrottle {
        &self.throttle
    }

    /// Frames processed
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}

fn score_job(
    zones: &ZoneIndex,
    scorer: &RiskScorer,
    job: &mut ScoringJob,
    timestamp: Instant,
) -> EntityReport {
    let center = job.track.bbox.center();
    let zone = zones.classify(center);
    let speed = KinematicsEstimator::speed(&mut job.profile, center, timestamp);

    let input = ScoringInput {
        position: center,
        zone,
        speed,
        posture: job.pose.posture,
        posture_risk: job.pose.risk(),
    };
    let assessment = scorer.calculate(&mut job.profile, &input, timestamp);

    EntityReport {
        id: job.track.id.clone(),
        bbox: job.track.bbox,
        center,
        speed,
        posture: job.pose.posture,
        assessment,
    }
}

fn tagged_poses(poses: &[PoseReading]) -> HashMap<&EntityId, &PoseReading> {
    let mut tagged = HashMap::new();
    for pose in poses {
        if let Some(id) = &pose.entity {
            tagged.entry(id).or_insert(pose);
        }
    }
    tagged
}

/// Tagged reading first, then the untagged reading at the track's position,
/// then STANDING.
fn resolve_pose(
    id: &EntityId,
    index: usize,
    poses: &[PoseReading],
    tagged: &HashMap<&EntityId, &PoseReading>,
) -> PoseReading {
    if let Some(pose) = tagged.get(id) {
        return (*pose).clone();
    }
    match poses.get(index) {
        Some(pose) if pose.entity.is_none() => pose.clone(),
        _ => PoseReading::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FactorKind, RiskStatus};

    fn pipeline() -> FramePipeline {
        FramePipeline::with_defaults().unwrap()
    }

    fn outside_box() -> BoundingBox {
        // Center (1000, 680), outside every default zone
        BoundingBox::new(950, 630, 1050, 730)
    }

    #[test]
    fn test_empty_frame() {
        let mut p = pipeline();
        let report = p.process_frame(FrameInput::empty(Instant::now()));
        assert_eq!(report.frame_number, 1);
        assert!(report.entities.is_empty());
        assert!(report.critical.is_empty());
        assert!(report.alert.is_none());
        assert!(p.store().is_empty());
    }

    #[test]
    fn test_positional_pose_alignment() {
        let mut p = pipeline();
        let frame = FrameInput::new(
            Instant::now(),
            vec![
                TrackedBox::new("1", outside_box()),
                TrackedBox::new("2", outside_box()),
            ],
        )
        .with_poses(vec![PoseReading::new(Posture::Standing), PoseReading::new(Posture::Bending)]);

        let report = p.process_frame(frame);
        let second = report.entity(&EntityId::from("2")).unwrap();
        assert_eq!(second.posture, Posture::Bending);
        assert_eq!(second.assessment.factor(FactorKind::Posture), Some(20));
        assert_eq!(report.entity(&EntityId::from("1")).unwrap().posture, Posture::Standing);
    }

    #[test]
    fn test_tagged_pose_wins_over_position() {
        let mut p = pipeline();
        let frame = FrameInput::new(
            Instant::now(),
            vec![
                TrackedBox::new("1", outside_box()),
                TrackedBox::new("2", outside_box()),
            ],
        )
        .with_poses(vec![
            PoseReading::new(Posture::Kneeling).for_entity("2"),
            PoseReading::new(Posture::Lying),
        ]);

        let report = p.process_frame(frame);
        // Track 1's positional slot holds a reading tagged for someone else
        assert_eq!(report.entity(&EntityId::from("1")).unwrap().posture, Posture::Standing);
        assert_eq!(report.entity(&EntityId::from("2")).unwrap().posture, Posture::Kneeling);
    }

    #[test]
    fn test_missing_pose_defaults_to_standing() {
        let mut p = pipeline();
        let frame = FrameInput::new(
            Instant::now(),
            vec![
                TrackedBox::new("1", outside_box()),
                TrackedBox::new("2", outside_box()),
            ],
        )
        .with_poses(vec![PoseReading::new(Posture::Lying)]);

        let report = p.process_frame(frame);
        assert_eq!(report.entity(&EntityId::from("1")).unwrap().posture, Posture::Lying);
        let second = report.entity(&EntityId::from("2")).unwrap();
        assert_eq!(second.posture, Posture::Standing);
        assert_eq!(second.assessment.score, 0);
    }

    #[test]
    fn test_duplicate_identity_scored_once() {
        let mut p = pipeline();
        let frame = FrameInput::new(
            Instant::now(),
            vec![
                TrackedBox::new("7", BoundingBox::new(350, 450, 450, 550)),
                TrackedBox::new("7", outside_box()),
            ],
        );

        let report = p.process_frame(frame);
        assert_eq!(report.entities.len(), 1);
        assert_eq!(report.entities[0].assessment.zone, "HEAVY_MACHINERY");
        assert_eq!(p.store().len(), 1);
        let profile = p.store().get(&EntityId::from("7")).unwrap();
        assert_eq!(profile.scores().len(), 1);
        assert_eq!(profile.positions().len(), 1);
    }

    #[test]
    fn test_entities_keep_tracker_order() {
        let mut p = pipeline();
        let tracks: Vec<TrackedBox> = (0..32u64)
            .map(|i| TrackedBox::new(i, outside_box()))
            .collect();
        let report = p.process_frame(FrameInput::new(Instant::now(), tracks));

        let ids: Vec<EntityId> = report.entities.iter().map(|e| e.id.clone()).collect();
        let expected: Vec<EntityId> = (0..32u64).map(EntityId::from).collect();
        assert_eq!(ids, expected);
        assert_eq!(p.store().len(), 32);
    }

    #[test]
    fn test_reaper_runs_on_cadence() {
        let config = EngineConfig::builder()
            .max_age_secs(1.0)
            .reap_every_frames(3)
            .build();
        let mut p = FramePipeline::new(config).unwrap();
        let t0 = Instant::now();

        let first = p.process_frame(FrameInput::new(t0, vec![TrackedBox::new("gone", outside_box())]));
        assert_eq!(first.evicted, None);
        p.process_frame(FrameInput::empty(t0 + Duration::from_secs(1)));
        let third = p.process_frame(FrameInput::empty(t0 + Duration::from_secs(2)));

        assert_eq!(third.evicted, Some(1));
        assert!(p.store().is_empty());
    }

    #[test]
    fn test_stats() {
        let mut p = pipeline();
        let t0 = Instant::now();
        assert_eq!(p.stats().fps, 0.0);

        for i in 0..5u64 {
            p.process_frame(FrameInput::new(
                t0 + Duration::from_millis(250 * i),
                vec![TrackedBox::new("1", outside_box())],
            ));
        }

        let stats = p.stats();
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.tracked, 1);
        assert_eq!(stats.alerts, 0);
        assert!((stats.elapsed_secs - 1.0).abs() < 1e-9);
        assert!((stats.fps - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::builder().history_capacity(1).build();
        assert!(FramePipeline::new(config).is_ok());

        let mut config = EngineConfig::default();
        config.zones[0].vertices.truncate(2);
        assert!(FramePipeline::new(config).is_err());
    }

    #[test]
    fn test_status_reported_per_entity() {
        let mut p = pipeline();
        let report = p.process_frame(FrameInput::new(
            Instant::now(),
            vec![TrackedBox::new("1", BoundingBox::new(350, 450, 450, 550))],
        ));
        let entity = &report.entities[0];
        assert_eq!(entity.center, Point::new(400.0, 500.0));
        assert_eq!(entity.assessment.score, 40);
        assert_eq!(entity.assessment.status, RiskStatus::Warning);
    }
}
