//! Per-person profile with bounded rolling histories.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::Point;

/// Default capacity of every rolling history
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Opaque identity assigned by the upstream tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a tracker identity
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-capacity ring buffer; pushing onto a full buffer drops the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn push(&mut self, item: T) {
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Entry `n` steps back from the newest (`0` is the newest)
    pub fn nth_back(&self, n: usize) -> Option<&T> {
        self.items.iter().rev().nth(n)
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }
}

/// A position together with the frame time it was observed at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedPosition {
    /// Image position
    pub position: Point,
    /// Frame timestamp
    pub timestamp: Instant,
}

/// Rolling state for one tracked person.
#[derive(Debug, Clone)]
pub struct EntityProfile {
    id: EntityId,
    positions: BoundedHistory<ObservedPosition>,
    speeds: BoundedHistory<f64>,
    scores: BoundedHistory<u8>,
    zones: BoundedHistory<String>,
    dwell_start: Option<Instant>,
    last_update: Instant,
}

impl EntityProfile {
    /// Create an empty profile first seen at `now`
    pub fn new(id: EntityId, history_capacity: usize, now: Instant) -> Self {
        Self {
            id,
            positions: BoundedHistory::new(history_capacity),
            speeds: BoundedHistory::new(history_capacity),
            scores: BoundedHistory::new(history_capacity),
            zones: BoundedHistory::new(history_capacity),
            dwell_start: None,
            last_update: now,
        }
    }

    /// Identity
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Position history
    pub fn positions(&self) -> &BoundedHistory<ObservedPosition> {
        &self.positions
    }

    /// Stored speeds (px/s)
    pub fn speeds(&self) -> &BoundedHistory<f64> {
        &self.speeds
    }

    /// Stored risk scores
    pub fn scores(&self) -> &BoundedHistory<u8> {
        &self.scores
    }

    /// Stored zone labels
    pub fn zones(&self) -> &BoundedHistory<String> {
        &self.zones
    }

    /// When the current zone visit started, if inside a zone
    pub fn dwell_start(&self) -> Option<Instant> {
        self.dwell_start
    }

    /// Last time this profile was updated
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    /// Time since the last update; zero if `now` precedes it
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_update)
    }

    /// Continuous time inside the current zone; zero when outside
    pub fn dwell_elapsed(&self, now: Instant) -> Duration {
        self.dwell_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Append a position observation
    pub fn push_position(&mut self, position: Point, timestamp: Instant) {
        self.positions.push(ObservedPosition { position, timestamp });
        self.last_update = self.last_update.max(timestamp);
    }

    /// Append the outcome of one scoring pass (speed, score, zone label)
    pub fn record_assessment(&mut self, zone: &str, speed: f64, score: u8, timestamp: Instant) {
        self.speeds.push(speed);
        self.scores.push(score);
        self.zones.push(zone.to_string());
        self.last_update = self.last_update.max(timestamp);
    }

    /// Append to all four histories at once
    pub fn record_observation(
        &mut self,
        position: Point,
        timestamp: Instant,
        zone: &str,
        speed: f64,
        score: u8,
    ) {
        self.push_position(position, timestamp);
        self.record_assessment(zone, speed, score, timestamp);
    }

    /// Mark the profile as inside a zone; starts the dwell timer on entry.
    ///
    /// Returns the dwell start.
    pub fn enter_zone(&mut self, now: Instant) -> Instant {
        *self.dwell_start.get_or_insert(now)
    }

    /// Mark the profile as outside every zone; clears the dwell timer
    pub fn leave_zone(&mut self) {
        self.dwell_start = None;
    }
}
