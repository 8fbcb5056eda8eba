//! Owner of every per-identity profile in one stream.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::domain::{EntityId, EntityProfile, Point, DEFAULT_HISTORY_CAPACITY};

/// Per-stream profile store.
///
/// Profiles are created lazily on first observation and only removed through
/// [`EntityProfileStore::evict`]. Profiles never reference each other.
#[derive(Debug)]
pub struct EntityProfileStore {
    profiles: HashMap<EntityId, EntityProfile>,
    history_capacity: usize,
}

impl EntityProfileStore {
    /// Create a store whose profiles keep `history_capacity` entries per history
    pub fn new(history_capacity: usize) -> Self {
        Self {
            profiles: HashMap::new(),
            history_capacity: history_capacity.max(1),
        }
    }

    /// Create a store with the default history capacity
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }

    /// Return the existing profile or create an empty one first seen at `now`
    pub fn get_or_create(&mut self, id: &EntityId, now: Instant) -> &mut EntityProfile {
        let capacity = self.history_capacity;
        self.profiles.entry(id.clone()).or_insert_with(|| {
            tracing::trace!(entity = %id, "Creating profile");
            EntityProfile::new(id.clone(), capacity, now)
        })
    }

    /// Look up a profile
    pub fn get(&self, id: &EntityId) -> Option<&EntityProfile> {
        self.profiles.get(id)
    }

    /// Append one observation to all four histories of a profile
    pub fn record_observation(
        &mut self,
        id: &EntityId,
        position: Point,
        timestamp: Instant,
        zone: &str,
        speed: f64,
        score: u8,
    ) {
        self.get_or_create(id, timestamp)
            .record_observation(position, timestamp, zone, speed, score);
    }

    /// Identities idle for strictly longer than `max_age`, sorted
    pub fn list_stale(&self, now: Instant, max_age: Duration) -> Vec<EntityId> {
        let mut stale: Vec<EntityId> = self
            .profiles
            .values()
            .filter(|p| p.idle_for(now) > max_age)
            .map(|p| p.id().clone())
            .collect();
        stale.sort();
        stale
    }

    /// Remove a profile, returning it if present
    pub fn evict(&mut self, id: &EntityId) -> Option<EntityProfile> {
        self.profiles.remove(id)
    }

    /// Move a profile out of the store for exclusive use, creating it if needed.
    ///
    /// Pair with [`EntityProfileStore::restore`].
    pub(crate) fn take_or_create(&mut self, id: &EntityId, now: Instant) -> EntityProfile {
        self.profiles.remove(id).unwrap_or_else(|| {
            tracing::trace!(entity = %id, "Creating profile");
            EntityProfile::new(id.clone(), self.history_capacity, now)
        })
    }

    /// Put a profile back after exclusive use
    pub(crate) fn restore(&mut self, profile: EntityProfile) {
        self.profiles.insert(profile.id().clone(), profile);
    }

    /// Identities currently stored, in no particular order
    pub fn identities(&self) -> impl Iterator<Item = &EntityId> {
        self.profiles.keys()
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when no profiles are stored
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Capacity of each profile history
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

impl Default for EntityProfileStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
