use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::VecDeque;

use crate::application::ports::rate_limiter::{
    RateLimitDecision, RateLimitError, RateLimitPolicy, RateLimiter,
};
use crate::domain::value_objects::ClientKey;

/// Per-process sliding window. Each client keeps the timestamps of its
/// admitted requests inside the current window.
pub struct InMemorySlidingWindowLimiter {
    windows: DashMap<ClientKey, VecDeque<i64>>,
    policy: RateLimitPolicy,
}

impl InMemorySlidingWindowLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            windows: DashMap::new(),
            policy,
        }
    }

    fn check_at(&self, key: &ClientKey, now_ms: i64) -> RateLimitDecision {
        let window_start = now_ms - self.policy.window_ms();
        let mut timestamps = self.windows.entry(key.clone()).or_default();

        while timestamps.front().is_some_and(|ts| *ts <= window_start) {
            timestamps.pop_front();
        }

        let (allowed, counted) = self.policy.admit(timestamps.len() as u32);
        if allowed {
            timestamps.push_back(now_ms);
        }

        RateLimitDecision::evaluate(
            &self.policy,
            allowed,
            counted,
            timestamps.front().copied(),
            now_ms,
        )
    }
}

#[async_trait]
impl RateLimiter for InMemorySlidingWindowLimiter {
    async fn check(&self, key: &ClientKey) -> Result<RateLimitDecision, RateLimitError> {
        Ok(self.check_at(key, Utc::now().timestamp_millis()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let limiter = InMemorySlidingWindowLimiter::new(RateLimitPolicy::default());
        let key = ClientKey::from_address("198.51.100.1");

        let first = limiter.check_at(&key, 1_000);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);

        let second = limiter.check_at(&key, 2_000);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.check_at(&key, 3_000);
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);
        assert_eq!(third.reset_at_ms, 61_000);
        assert_eq!(third.retry_after_secs(3_000), 58);
    }

    #[test]
    fn test_window_slides() {
        let limiter = InMemorySlidingWindowLimiter::new(RateLimitPolicy::default());
        let key = ClientKey::from_address("198.51.100.1");

        limiter.check_at(&key, 0);
        limiter.check_at(&key, 30_000);
        assert!(!limiter.check_at(&key, 59_999).allowed);

        // The first request leaves the window at 60s.
        let decision = limiter.check_at(&key, 60_000);
        assert!(decision.allowed);
        assert_eq!(decision.reset_at_ms, 90_000);
    }

    #[test]
    fn test_rejections_do_not_extend_window() {
        let limiter = InMemorySlidingWindowLimiter::new(RateLimitPolicy::new(1, Duration::from_secs(10)));
        let key = ClientKey::anonymous();

        assert!(limiter.check_at(&key, 0).allowed);
        for now in [1_000, 5_000, 9_000] {
            assert!(!limiter.check_at(&key, now).allowed);
        }
        assert!(limiter.check_at(&key, 10_000).allowed);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = InMemorySlidingWindowLimiter::new(RateLimitPolicy::new(1, Duration::from_secs(60)));

        assert!(limiter.check_at(&ClientKey::from_address("a"), 0).allowed);
        assert!(limiter.check_at(&ClientKey::from_address("b"), 0).allowed);
        assert!(!limiter.check_at(&ClientKey::from_address("a"), 1).allowed);
    }
}
