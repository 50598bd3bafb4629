//! Linear backoff policy for connection and query retries.

use std::time::Duration;

/// Bounded retry with a linearly growing delay: no wait before the first
/// attempt, then `backoff_step`, `2 × backoff_step`, and so on.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base delay multiplied by the number of failed attempts so far.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before the given 1-based attempt, or `None` for the
    /// first attempt.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            None
        } else {
            Some(self.backoff_step * (attempt - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delay_before_first_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), None);
    }

    #[test]
    fn test_delays_grow_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(2), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_before(3), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_custom_step() {
        let policy = RetryPolicy {
            max_attempts: 5,
            backoff_step: Duration::from_millis(250),
        };
        assert_eq!(policy.delay_before(4), Some(Duration::from_millis(750)));
    }
}
