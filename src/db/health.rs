//! Point-in-time database health snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Result of a single health probe. Freshly computed on every check,
/// never cached, never an error: probe failures are folded into the
/// `healthy`/`error` fields.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResult {
    pub healthy: bool,
    /// Wall-clock time from probe start to completion, including
    /// connection acquisition. Populated on failure too.
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthResult {
    pub fn healthy(latency: Duration) -> Self {
        Self {
            healthy: true,
            latency_ms: latency.as_millis() as u64,
            error: None,
            checked_at: Utc::now(),
        }
    }

    pub fn unhealthy(latency: Duration, error: impl ToString) -> Self {
        Self {
            healthy: false,
            latency_ms: latency.as_millis() as u64,
            error: Some(error.to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_snapshot() {
        let result = HealthResult::healthy(Duration::from_millis(12));
        assert!(result.healthy);
        assert_eq!(result.latency_ms, 12);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_unhealthy_snapshot_keeps_latency() {
        let result = HealthResult::unhealthy(Duration::from_millis(340), "connection refused");
        assert!(!result.healthy);
        assert_eq!(result.latency_ms, 340);
        assert_eq!(result.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_error_field_omitted_when_healthy() {
        let json = serde_json::to_value(HealthResult::healthy(Duration::ZERO)).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["healthy"], true);
    }
}
