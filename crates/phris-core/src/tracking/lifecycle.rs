//! Stale profile eviction.
//!
//! A profile that has not been updated for longer than the configured max age
//! belongs to a person the tracker has dropped; the reaper removes it so the
//! store does not grow without bound.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::EntityProfileStore;

/// Configuration for stale profile eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Idle time after which a profile is evicted, in seconds (default: 60.0)
    pub max_age_secs: f64,
    /// Run the reaper every this many frames (default: 30)
    pub reap_every_frames: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 60.0,
            reap_every_frames: 30,
        }
    }
}

impl LifecycleConfig {
    /// Max idle age as a duration
    pub fn max_age(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_age_secs).unwrap_or(Duration::ZERO)
    }
}

/// Periodically evicts idle profiles from a store.
#[derive(Debug, Clone)]
pub struct LifecycleReaper {
    max_age: Duration,
    reap_every_frames: u64,
}

impl LifecycleReaper {
    /// Create a reaper from its configuration
    pub fn new(config: &LifecycleConfig) -> Self {
        Self {
            max_age: config.max_age(),
            reap_every_frames: config.reap_every_frames.max(1),
        }
    }

    /// Create a reaper with default configuration
    pub fn with_defaults() -> Self {
        Self::new(&LifecycleConfig::default())
    }

    /// True when the reaper is due on the given 1-based frame number
    pub fn is_due(&self, frame_number: u64) -> bool {
        frame_number > 0 && frame_number % self.reap_every_frames == 0
    }

    /// Evict every profile idle for strictly longer than the max age.
    ///
    /// Returns the number of evicted profiles.
    pub fn reap(&self, store: &mut EntityProfileStore, now: Instant) -> usize {
        let stale = store.list_stale(now, self.max_age);
        for id in &stale {
            store.evict(id);
        }

        if !stale.is_empty() {
            tracing::info!(
                evicted = stale.len(),
                remaining = store.len(),
                "Evicted stale profiles"
            );
        }

        stale.len()
    }

    /// Configured max idle age
    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;

    #[test]
    fn test_reap_boundary() {
        let t0 = Instant::now();
        let mut store = EntityProfileStore::with_defaults();
        let idle_61 = EntityId::from("a");
        let idle_59 = EntityId::from("b");
        store.get_or_create(&idle_61, t0);
        store.get_or_create(&idle_59, t0 + Duration::from_secs(2));

        let reaper = LifecycleReaper::with_defaults();
        let evicted = reaper.reap(&mut store, t0 + Duration::from_secs(61));

        assert_eq!(evicted, 1);
        assert!(store.get(&idle_61).is_none());
        assert!(store.get(&idle_59).is_some());
    }

    #[test]
    fn test_exactly_max_age_is_retained() {
        let t0 = Instant::now();
        let mut store = EntityProfileStore::with_defaults();
        store.get_or_create(&EntityId::from("edge"), t0);

        let reaper = LifecycleReaper::with_defaults();
        assert_eq!(reaper.reap(&mut store, t0 + Duration::from_secs(60)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reap_on_empty_store() {
        let mut store = EntityProfileStore::with_defaults();
        let reaper = LifecycleReaper::with_defaults();
        assert_eq!(reaper.reap(&mut store, Instant::now()), 0);
    }

    #[test]
    fn test_cadence() {
        let reaper = LifecycleReaper::new(&LifecycleConfig {
            max_age_secs: 60.0,
            reap_every_frames: 30,
        });
        assert!(!reaper.is_due(0));
        assert!(!reaper.is_due(29));
        assert!(reaper.is_due(30));
        assert!(reaper.is_due(60));

        // A zero cadence would never fire; it is raised to every frame
        let every = LifecycleReaper::new(&LifecycleConfig {
            max_age_secs: 1.0,
            reap_every_frames: 0,
        });
        assert!(every.is_due(1));
    }

    #[test]
    fn test_invalid_max_age_falls_back_to_zero() {
        let config = LifecycleConfig {
            max_age_secs: -5.0,
            reap_every_frames: 1,
        };
        assert_eq!(config.max_age(), Duration::ZERO);
    }
}
