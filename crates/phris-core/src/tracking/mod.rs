//! Per-identity state management.
//!
//! - **[`EntityProfileStore`]**: owns every profile in a stream
//! - **[`KinematicsEstimator`]**: speed and acceleration from profile history
//! - **[`LifecycleReaper`]**: evicts profiles the tracker stopped reporting
//!
//! # Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use phris_core::domain::{EntityId, Point};
//! use phris_core::tracking::{EntityProfileStore, KinematicsEstimator, LifecycleReaper};
//!
//! let t0 = Instant::now();
//! let mut store = EntityProfileStore::with_defaults();
//! let id = EntityId::from("1");
//!
//! let profile = store.get_or_create(&id, t0);
//! KinematicsEstimator::speed(profile, Point::new(0.0, 0.0), t0);
//!
//! let reaper = LifecycleReaper::with_defaults();
//! assert_eq!(reaper.reap(&mut store, t0 + Duration::from_secs(61)), 1);
//! ```

pub mod kinematics;
pub mod lifecycle;
pub mod store;

pub use kinematics::KinematicsEstimator;
pub use lifecycle::{LifecycleConfig, LifecycleReaper};
pub use store::EntityProfileStore;
