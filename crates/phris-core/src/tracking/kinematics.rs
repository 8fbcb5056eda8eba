//! Speed and acceleration estimation from a profile's history.

use std::time::Instant;

use crate::domain::{EntityProfile, Point};

/// Stateless estimator working on a profile's position and speed histories.
pub struct KinematicsEstimator;

impl KinematicsEstimator {
    /// Record a position and return the speed (px/s) over the last step.
    ///
    /// Returns 0 when fewer than two positions are stored, when the elapsed
    /// time between them is not positive, or when the result is not finite.
    pub fn speed(profile: &mut EntityProfile, position: Point, timestamp: Instant) -> f64 {
        profile.push_position(position, timestamp);

        let positions = profile.positions();
        let (Some(current), Some(previous)) = (positions.nth_back(0), positions.nth_back(1)) else {
            return 0.0;
        };

        let Some(elapsed) = current.timestamp.checked_duration_since(previous.timestamp) else {
            return 0.0;
        };
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }

        let speed = current.position.distance(&previous.position) / secs;
        if speed.is_finite() {
            speed
        } else {
            0.0
        }
    }

    /// Speed change relative to the second-most-recent stored speed.
    ///
    /// Must be called before the current speed is stored. Returns 0 with
    /// fewer than two stored speeds.
    pub fn acceleration(profile: &EntityProfile, current_speed: f64) -> f64 {
        match profile.speeds().nth_back(1) {
            Some(previous) => current_speed - previous,
            None => 0.0,
        }
    }
}
