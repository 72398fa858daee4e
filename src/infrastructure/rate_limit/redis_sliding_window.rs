use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::Pool;
use once_cell::sync::Lazy;
use redis::Script;
use uuid::Uuid;

use crate::application::ports::rate_limiter::{
    RateLimitDecision, RateLimitError, RateLimitPolicy, RateLimiter,
};
use crate::domain::value_objects::ClientKey;

pub const KEY_PREFIX: &str = "firepk/ratelimit:";

/// Prunes the window, adds the request only while under the limit, and
/// returns the count seen before the add with the oldest remaining score
/// (-1 for an empty set). Runs atomically on the server.
static SLIDING_WINDOW: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
redis.call('ZREMRANGEBYSCORE', KEYS[1], 0, now - window)
local existing = redis.call('ZCARD', KEYS[1])
if existing < tonumber(ARGV[3]) then
    redis.call('ZADD', KEYS[1], now, ARGV[4])
end
redis.call('PEXPIRE', KEYS[1], window)
local oldest = redis.call('ZRANGE', KEYS[1], 0, 0, 'WITHSCORES')
if oldest[2] then
    return {existing, tonumber(oldest[2])}
end
return {existing, -1}
",
    )
});

/// Sliding window over a sorted set of request timestamps, one set per client.
pub struct RedisSlidingWindowLimiter {
    pool: Pool,
    policy: RateLimitPolicy,
}

impl RedisSlidingWindowLimiter {
    pub fn new(pool: Pool, policy: RateLimitPolicy) -> Self {
        Self { pool, policy }
    }

    fn window_key(key: &ClientKey) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

fn decision_from_reply(
    policy: &RateLimitPolicy,
    existing: u32,
    oldest_ms: i64,
    now_ms: i64,
) -> RateLimitDecision {
    let (allowed, counted) = policy.admit(existing);
    let oldest_ms = (oldest_ms >= 0).then_some(oldest_ms);
    RateLimitDecision::evaluate(policy, allowed, counted, oldest_ms, now_ms)
}

#[async_trait]
impl RateLimiter for RedisSlidingWindowLimiter {
    async fn check(&self, key: &ClientKey) -> Result<RateLimitDecision, RateLimitError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RateLimitError::BackendError(e.to_string()))?;

        let now_ms = Utc::now().timestamp_millis();
        let member = format!("{}-{}", now_ms, Uuid::new_v4());

        let (existing, oldest_ms): (u32, i64) = SLIDING_WINDOW
            .key(Self::window_key(key))
            .arg(now_ms)
            .arg(self.policy.window_ms())
            .arg(self.policy.max_requests)
            .arg(member)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::BackendError(e.to_string()))?;

        Ok(decision_from_reply(
            &self.policy,
            existing,
            oldest_ms,
            now_ms,
        ))
    }
}
