use async_trait::async_trait;
use std::time::Duration;

use crate::domain::value_objects::ClientKey;

#[derive(Debug)]
pub enum RateLimitError {
    BackendError(String),
}

impl std::fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateLimitError::BackendError(msg) => write!(f, "Rate limit backend error: {}", msg),
        }
    }
}

impl std::error::Error for RateLimitError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Admission for a client that already has `existing` requests inside the
    /// window. Returns whether the request proceeds and how many requests the
    /// window then holds. Rejected requests are never counted.
    pub fn admit(&self, existing: u32) -> (bool, u32) {
        if existing < self.max_requests {
            (true, existing + 1)
        } else {
            (false, existing)
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(60))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Unix milliseconds at which the oldest counted request leaves the window.
    pub reset_at_ms: i64,
}

impl RateLimitDecision {
    /// `in_window` counts the requests inside the window including the
    /// current one when it was admitted.
    pub fn evaluate(
        policy: &RateLimitPolicy,
        allowed: bool,
        in_window: u32,
        oldest_ms: Option<i64>,
        now_ms: i64,
    ) -> Self {
        Self {
            allowed,
            limit: policy.max_requests,
            remaining: policy.max_requests.saturating_sub(in_window),
            reset_at_ms: oldest_ms.unwrap_or(now_ms) + policy.window_ms(),
        }
    }

    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let wait_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        wait_ms.div_ceil(1000)
    }
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts one request for `key` and reports whether it may proceed.
    async fn check(&self, key: &ClientKey) -> Result<RateLimitDecision, RateLimitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.max_requests, 2);
        assert_eq!(policy.window_ms(), 60_000);
    }

    #[test]
    fn test_admit_boundaries() {
        let policy = RateLimitPolicy::default();

        assert_eq!(policy.admit(0), (true, 1));
        assert_eq!(policy.admit(1), (true, 2));
        assert_eq!(policy.admit(2), (false, 2));
        assert_eq!(policy.admit(5), (false, 5));
    }

    #[test]
    fn test_decision_remaining_and_reset() {
        let policy = RateLimitPolicy::default();
        let decision = RateLimitDecision::evaluate(&policy, true, 1, Some(1_000), 5_000);

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
        assert_eq!(decision.reset_at_ms, 61_000);
        assert_eq!(decision.retry_after_secs(5_000), 56);
    }

    #[test]
    fn test_rejected_decision_has_no_remaining() {
        let policy = RateLimitPolicy::default();
        let decision = RateLimitDecision::evaluate(&policy, false, 2, None, 10_000);

        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.reset_at_ms, 70_000);
        assert_eq!(decision.retry_after_secs(80_000), 0);
    }
}
