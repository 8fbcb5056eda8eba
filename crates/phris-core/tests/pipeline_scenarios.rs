//! End-to-end scenarios driving the frame pipeline with synthetic tracker output.
//!
//! All frames are deterministic: fixed boxes, fixed timestamps offset from a
//! single base instant.

use std::time::{Duration, Instant};

use phris_core::{
    BoundingBox, EngineConfig, EntityId, FactorKind, FrameInput, FramePipeline, PoseReading,
    Posture, RiskFactor, RiskStatus, TrackedBox, Trend, SAFE_ZONE_LABEL,
};

/// Box centred on (400, 500), inside HEAVY_MACHINERY only
fn heavy_machinery_box() -> BoundingBox {
    BoundingBox::new(350, 450, 450, 550)
}

/// Box centred on (x, 680), below every default zone
fn walkway_box(x: i32) -> BoundingBox {
    BoundingBox::new(x - 40, 630, x + 40, 730)
}

fn at(t0: Instant, millis: u64) -> Instant {
    t0 + Duration::from_millis(millis)
}

#[test]
fn stationary_worker_in_heavy_machinery_becomes_critical() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    let id = EntityId::from("1");

    let mut last = None;
    for second in 0..=6 {
        let frame = FrameInput::new(
            at(t0, second * 1000),
            vec![TrackedBox::new("1", heavy_machinery_box())],
        )
        .with_poses(vec![PoseReading::new(Posture::Standing)]);
        last = Some(pipeline.process_frame(frame));
    }

    let report = last.unwrap();
    let worker = report.entity(&id).unwrap();
    assert_eq!(worker.speed, 0.0);
    assert_eq!(
        worker.assessment.factors,
        vec![
            RiskFactor { kind: FactorKind::Zone, points: 40 },
            RiskFactor { kind: FactorKind::DwellTime, points: 20 },
        ]
    );
    assert_eq!(worker.assessment.score, 60);
    assert_eq!(worker.assessment.status, RiskStatus::Critical);
    assert_eq!(worker.assessment.zone, "HEAVY_MACHINERY");

    // Critical status is not the same as the alert threshold (> 70)
    assert!(report.critical.is_empty());
    assert!(report.alert.is_none());

    let profile = pipeline.store().get(&id).unwrap();
    assert_eq!(profile.scores().len(), 7);
    assert_eq!(profile.zones().latest().map(String::as_str), Some("HEAVY_MACHINERY"));
}

#[test]
fn fast_walker_outside_zones_stays_safe() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();

    pipeline.process_frame(FrameInput::new(t0, vec![TrackedBox::new("2", walkway_box(400))]));
    let report = pipeline.process_frame(FrameInput::new(
        at(t0, 1000),
        vec![TrackedBox::new("2", walkway_box(650))],
    ));

    let walker = report.entity(&EntityId::from("2")).unwrap();
    assert!((walker.speed - 250.0).abs() < 1e-9);
    assert_eq!(walker.assessment.zone, SAFE_ZONE_LABEL);
    assert_eq!(walker.assessment.factor(FactorKind::Speed), Some(20));
    // First stored speed is 0; a second stored speed is needed for acceleration
    assert_eq!(walker.assessment.factor(FactorKind::Acceleration), None);
    assert_eq!(walker.assessment.score, 20);
    assert_eq!(walker.assessment.status, RiskStatus::Safe);
}

#[test]
fn alerts_are_throttled_across_frames() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    // Zone 40, dwell 20, posture 20 (lying) = 80 after more than five seconds
    let lying = || vec![PoseReading::new(Posture::Lying)];
    let worker = || vec![TrackedBox::new("3", heavy_machinery_box())];

    pipeline.process_frame(FrameInput::new(t0, worker()).with_poses(lying()));

    let first = pipeline.process_frame(FrameInput::new(at(t0, 6000), worker()).with_poses(lying()));
    assert_eq!(first.critical.len(), 1);
    assert_eq!(first.critical[0].score, 80);
    assert_eq!(first.alert.as_ref().map(|a| a.sequence), Some(1));

    let second = pipeline.process_frame(FrameInput::new(at(t0, 6300), worker()).with_poses(lying()));
    assert_eq!(second.critical.len(), 1);
    assert!(second.alert.is_none());

    let third = pipeline.process_frame(FrameInput::new(at(t0, 7200), worker()).with_poses(lying()));
    assert_eq!(third.alert.as_ref().map(|a| a.sequence), Some(2));
    assert_eq!(pipeline.stats().alerts, 2);
}

#[test]
fn one_alert_for_several_critical_workers() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    let crew = || {
        vec![
            TrackedBox::new("a", heavy_machinery_box()),
            TrackedBox::new("b", BoundingBox::new(800, 500, 840, 560)),
        ]
    };
    let poses = || vec![PoseReading::new(Posture::Lying), PoseReading::new(Posture::Lying)];

    pipeline.process_frame(FrameInput::new(t0, crew()).with_poses(poses()));
    let report = pipeline.process_frame(FrameInput::new(at(t0, 6000), crew()).with_poses(poses()));

    assert_eq!(report.critical.len(), 2);
    let alert = report.alert.unwrap();
    assert_eq!(alert.critical.len(), 2);
    assert_eq!(pipeline.throttle().alert_count(), 1);
}

#[test]
fn dwell_restarts_after_leaving_zone() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    let id = EntityId::from("4");

    // Stationary frames one second apart keep speed and acceleration at zero
    let inside = |ms| FrameInput::new(at(t0, ms), vec![TrackedBox::new("4", heavy_machinery_box())]);
    let outside = |ms| FrameInput::new(at(t0, ms), vec![TrackedBox::new("4", walkway_box(400))]);

    pipeline.process_frame(inside(0));
    let before = pipeline.process_frame(inside(4000));
    assert_eq!(before.entity(&id).unwrap().assessment.factor(FactorKind::DwellTime), Some(15));

    pipeline.process_frame(outside(100_000));
    pipeline.process_frame(outside(101_000));
    assert!(pipeline.store().get(&id).unwrap().dwell_start().is_none());

    pipeline.process_frame(inside(200_000));
    let back = pipeline.process_frame(inside(201_000));
    let assessment = &back.entity(&id).unwrap().assessment;
    assert_eq!(assessment.factor(FactorKind::DwellTime), None);
    assert_eq!(assessment.score, 40);
}

#[test]
fn histories_are_bounded() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    let id = EntityId::from("5");

    for i in 0..150u64 {
        pipeline.process_frame(FrameInput::new(
            at(t0, i * 100),
            vec![TrackedBox::new("5", walkway_box(400))],
        ));
    }

    let profile = pipeline.store().get(&id).unwrap();
    assert_eq!(profile.positions().len(), 100);
    assert_eq!(profile.speeds().len(), 100);
    assert_eq!(profile.scores().len(), 100);
    assert_eq!(profile.zones().len(), 100);
    assert_eq!(
        profile.positions().latest().map(|p| p.timestamp),
        Some(at(t0, 149 * 100))
    );
}

#[test]
fn departed_workers_are_reaped() {
    let config = EngineConfig::builder().reap_every_frames(30).build();
    let mut pipeline = FramePipeline::new(config).unwrap();
    let t0 = Instant::now();

    // "old" is seen once at t0; "young" keeps being seen until t0 + 2 s
    pipeline.process_frame(FrameInput::new(
        t0,
        vec![
            TrackedBox::new("old", walkway_box(300)),
            TrackedBox::new("young", walkway_box(900)),
        ],
    ));
    pipeline.process_frame(FrameInput::new(
        at(t0, 2000),
        vec![TrackedBox::new("young", walkway_box(900))],
    ));

    let mut evictions = Vec::new();
    for frame in 3..=30u64 {
        let report = pipeline.process_frame(FrameInput::empty(at(t0, 61_000 + frame)));
        if let Some(n) = report.evicted {
            evictions.push((report.frame_number, n));
        }
    }

    assert_eq!(evictions, vec![(30, 1)]);
    assert!(pipeline.store().get(&EntityId::from("old")).is_none());
    assert!(pipeline.store().get(&EntityId::from("young")).is_some());
}

#[test]
fn empty_frames_are_not_errors() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    for i in 0..5u64 {
        let report = pipeline.process_frame(FrameInput::empty(at(t0, i * 33)));
        assert!(report.entities.is_empty());
    }
    let stats = pipeline.stats();
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.tracked, 0);
}

#[test]
fn overlapping_zones_use_declaration_order() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    // (600, 300) lies in both HEAVY_MACHINERY and ELECTRICAL
    let report = pipeline.process_frame(FrameInput::new(
        Instant::now(),
        vec![TrackedBox::new("6", BoundingBox::new(580, 280, 620, 320))],
    ));
    let assessment = &report.entities[0].assessment;
    assert_eq!(assessment.zone, "HEAVY_MACHINERY");
    assert_eq!(assessment.factor(FactorKind::Zone), Some(40));
}

#[test]
fn rising_scores_report_increasing_trend() {
    let mut pipeline = FramePipeline::with_defaults().unwrap();
    let t0 = Instant::now();
    let frame = |ms, posture| {
        FrameInput::new(at(t0, ms), vec![TrackedBox::new("7", walkway_box(400))])
            .with_poses(vec![PoseReading::new(posture)])
    };

    pipeline.process_frame(frame(0, Posture::Standing));
    pipeline.process_frame(frame(1000, Posture::Kneeling));
    let report = pipeline.process_frame(frame(2000, Posture::Lying));

    // Scores 0, 15, 20
    assert_eq!(report.entities[0].assessment.trend, Trend::Increasing);
}
