//! Rate limiting of critical-state alerts.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::EntityId;

/// Configuration for alert throttling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum time between two emitted alerts, in seconds (default: 1.0)
    pub cooldown_secs: f64,
    /// Scores strictly above this are critical (default: 70)
    pub critical_score: u8,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 1.0,
            critical_score: 70,
        }
    }
}

impl AlertConfig {
    /// Cooldown as a duration
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.cooldown_secs).unwrap_or(Duration::ZERO)
    }
}

/// Unique identifier for an emitted alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(Uuid);

impl AlertId {
    /// Create a new random alert ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person whose score crossed the critical threshold this frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalEntity {
    /// Identity
    pub id: EntityId,
    /// Score that qualified them
    pub score: u8,
}

/// One emitted alert, handed to notification collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Unique alert id
    pub id: AlertId,
    /// Running alert counter after this alert (1-based)
    pub sequence: u64,
    /// Wall-clock emission time
    pub emitted_at: DateTime<Utc>,
    /// Every critical person at emission time
    pub critical: Vec<CriticalEntity>,
}

/// Outcome of evaluating one frame
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    /// Critical people this frame, whether or not an alert fired
    pub critical: Vec<CriticalEntity>,
    /// The alert emitted this frame, if the cooldown allowed one
    pub alert: Option<AlertEvent>,
}

impl AlertDecision {
    /// True when an alert was emitted
    pub fn fired(&self) -> bool {
        self.alert.is_some()
    }
}

#[derive(Debug, Default)]
struct AlertState {
    last_alert: Option<Instant>,
    alert_count: u64,
}

/// Per-stream alert throttle.
///
/// At most one alert is emitted per cooldown window no matter how many people
/// are critical. State is guarded by a mutex so evaluation can be shared
/// between threads; callers evaluate once per frame, after scoring.
#[derive(Debug)]
pub struct AlertThrottle {
    config: AlertConfig,
    cooldown: Duration,
    state: Mutex<AlertState>,
}

impl AlertThrottle {
    /// Create a throttle
    pub fn new(config: AlertConfig) -> Self {
        Self {
            cooldown: config.cooldown(),
            config,
            state: Mutex::new(AlertState::default()),
        }
    }

    /// Create a throttle with default configuration
    pub fn with_defaults() -> Self {
        Self::new(AlertConfig::default())
    }

    /// True when a score is above the critical threshold
    pub fn is_critical(&self, score: u8) -> bool {
        score > self.config.critical_score
    }

    /// Evaluate the frame's critical list at `now`.
    ///
    /// An alert fires when the list is non-empty and either no alert has
    /// fired yet or strictly more than the cooldown has elapsed since the
    /// last one.
    pub fn evaluate(&self, critical: Vec<CriticalEntity>, now: Instant) -> AlertDecision {
        if critical.is_empty() {
            return AlertDecision {
                critical,
                alert: None,
            };
        }

        let mut state = self.state.lock();
        let cooled_down = match state.last_alert {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.cooldown,
        };
        if !cooled_down {
            return AlertDecision {
                critical,
                alert: None,
            };
        }

        state.last_alert = Some(now);
        state.alert_count += 1;

        let event = AlertEvent {
            id: AlertId::new(),
            sequence: state.alert_count,
            emitted_at: Utc::now(),
            critical: critical.clone(),
        };
        drop(state);

        tracing::info!(
            alert_id = %event.id,
            sequence = event.sequence,
            critical = critical.len(),
            "Critical risk alert"
        );

        AlertDecision {
            critical,
            alert: Some(event),
        }
    }

    /// Total alerts emitted
    pub fn alert_count(&self) -> u64 {
        self.state.lock().alert_count
    }

    /// Time of the most recent alert
    pub fn last_alert(&self) -> Option<Instant> {
        self.state.lock().last_alert
    }

    /// Get configuration
    pub fn config(&self) -> &AlertConfig {
        &self.config
    }
}

impl Default for AlertThrottle {
    fn default() -> Self {
        Self::with_defaults()
    }
}
