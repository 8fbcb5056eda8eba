//! Replay of recorded tracker and pose output.
//!
//! Input is JSON Lines, one frame per line:
//!
//! ```json
//! {"timestamp": 0.033, "tracks": [{"id": "1", "bbox": {"x1": 350, "y1": 450, "x2": 450, "y2": 550}}], "poses": [{"posture": "BENDING"}]}
//! ```
//!
//! `timestamp` is seconds since the start of the recording. `poses` may be
//! omitted; readings are matched to tracks by `entity` tag or by position.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

use phris_core::{
    AlertEvent, EntityId, EntityReport, FrameInput, FramePipeline, FrameReport, PoseReading,
    RiskStatus, SessionStats, TrackedBox,
};

use crate::{site, OutputFormat};

/// Arguments for the replay command
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON Lines file of recorded frames
    #[arg(short = 'i', long)]
    pub frames: PathBuf,

    /// TOML site file (defaults to the built-in industrial layout)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordedFrame {
    /// Seconds since the start of the recording
    pub timestamp: f64,
    /// Tracker output in tracker order
    #[serde(default)]
    pub tracks: Vec<TrackedBox>,
    /// Pose readings
    #[serde(default)]
    pub poses: Vec<PoseReading>,
}

impl RecordedFrame {
    /// Convert to engine input anchored at `base`
    pub fn into_input(self, base: Instant) -> Result<FrameInput> {
        let offset = Duration::try_from_secs_f64(self.timestamp)
            .with_context(|| format!("Invalid timestamp {}", self.timestamp))?;
        Ok(FrameInput::new(base + offset, self.tracks).with_poses(self.poses))
    }
}

/// Parse JSON Lines frames; blank lines are skipped
pub fn parse_frames<R: BufRead>(reader: R) -> Result<Vec<RecordedFrame>> {
    let mut frames = Vec::new();
    let mut previous: Option<f64> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: RecordedFrame = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse frame on line {}", line_no))?;

        if !frame.timestamp.is_finite() || frame.timestamp < 0.0 {
            bail!("Invalid timestamp {} on line {}", frame.timestamp, line_no);
        }
        if let Some(prev) = previous {
            if frame.timestamp < prev {
                bail!(
                    "Frame on line {} goes back in time ({} < {})",
                    line_no,
                    frame.timestamp,
                    prev
                );
            }
        }
        previous = Some(frame.timestamp);
        frames.push(frame);
    }

    Ok(frames)
}

/// Outcome of a replay
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    /// Session statistics
    pub stats: SessionStats,
    /// Latest report per identity, ordered by identity
    pub entities: Vec<EntityReport>,
    /// Every alert emitted
    pub alerts: Vec<AlertEvent>,
    /// Highest score seen per identity
    pub peak_scores: BTreeMap<EntityId, u8>,
}

/// Run recorded frames through a pipeline
pub fn replay_frames<F>(
    pipeline: &mut FramePipeline,
    frames: Vec<RecordedFrame>,
    mut on_frame: F,
) -> Result<ReplaySummary>
where
    F: FnMut(&FrameReport),
{
    let base = Instant::now();
    let mut latest: BTreeMap<EntityId, EntityReport> = BTreeMap::new();
    let mut peak_scores: BTreeMap<EntityId, u8> = BTreeMap::new();
    let mut alerts = Vec::new();

    for frame in frames {
        let report = pipeline.process_frame(frame.into_input(base)?);
        on_frame(&report);

        for entity in &report.entities {
            let peak = peak_scores.entry(entity.id.clone()).or_insert(0);
            *peak = (*peak).max(entity.assessment.score);
            latest.insert(entity.id.clone(), entity.clone());
        }
        if let Some(alert) = report.alert {
            alerts.push(alert);
        }
    }

    Ok(ReplaySummary {
        stats: pipeline.stats(),
        entities: latest.into_values().collect(),
        alerts,
        peak_scores,
    })
}

/// Per-identity display row for tables
#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Score")]
    score: u8,
    #[tabled(rename = "Peak")]
    peak: u8,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Speed (px/s)")]
    speed: String,
    #[tabled(rename = "Posture")]
    posture: String,
    #[tabled(rename = "Factors")]
    factors: String,
}

impl EntityRow {
    fn new(report: &EntityReport, peak: u8) -> Self {
        let a = &report.assessment;
        let factors = a
            .factors
            .iter()
            .map(|f| format!("{}:{}", f.kind, f.points))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: report.id.to_string(),
            zone: a.zone.clone(),
            score: a.score,
            peak,
            status: status_label(a.status).to_string(),
            trend: a.trend.to_string(),
            speed: format!("{:.1}", report.speed),
            posture: report.posture.to_string(),
            factors,
        }
    }
}

fn status_label(status: RiskStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        RiskStatus::Safe => text.green(),
        RiskStatus::Warning => text.yellow(),
        RiskStatus::Critical => text.red().bold(),
    }
}

fn print_alert(report: &FrameReport) {
    let Some(alert) = &report.alert else {
        return;
    };
    let people = alert
        .critical
        .iter()
        .map(|c| format!("{} ({})", c.id, c.score))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{} frame {} #{} {} critical: {}",
        "[ALERT]".red().bold(),
        report.frame_number,
        alert.sequence,
        alert.critical.len().to_string().red().bold(),
        people
    );
}

/// Execute the replay command
pub async fn execute(args: ReplayArgs) -> Result<()> {
    let config = site::load(args.config.as_deref())?;
    let mut pipeline = FramePipeline::new(config).context("Failed to build frame pipeline")?;

    let file = std::fs::File::open(&args.frames)
        .with_context(|| format!("Failed to open {}", args.frames.display()))?;
    let frames = parse_frames(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to load {}", args.frames.display()))?;

    tracing::info!(frames = frames.len(), path = %args.frames.display(), "Replaying session");

    let format = args.format;
    let summary = replay_frames(&mut pipeline, frames, |report| {
        if format == OutputFormat::Table {
            print_alert(report);
        }
    })?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!();
            println!("{}", "Session summary".bold().cyan());
            println!(
                "  Frames: {}  FPS: {:.1}  People: {}  Alerts: {}  Runtime: {:.1}s",
                summary.stats.frames,
                summary.stats.fps,
                summary.stats.tracked,
                summary.stats.alerts.to_string().red().bold(),
                summary.stats.elapsed_secs
            );

            if summary.entities.is_empty() {
                println!("{}", "No people observed".yellow());
            } else {
                let rows: Vec<EntityRow> = summary
                    .entities
                    .iter()
                    .map(|e| EntityRow::new(e, summary.peak_scores.get(&e.id).copied().unwrap_or(0)))
                    .collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }
    }

    Ok(())
}
