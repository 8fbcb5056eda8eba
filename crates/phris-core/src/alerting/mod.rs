//! Alerting module for throttled critical-risk notifications.
//!
//! The engine only decides *when* an alert is due; delivery (sound, messaging,
//! dashboards) belongs to collaborators consuming [`AlertEvent`]s.

mod throttle;

pub use throttle::{
    AlertConfig, AlertDecision, AlertEvent, AlertId, AlertThrottle, CriticalEntity,
};
