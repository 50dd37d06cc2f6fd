//! Per-IP HTTP rate limiting.
//!
//! Sharded in-memory fixed-window counters: keys hash to one of several
//! shards, each behind its own mutex, so concurrent requests rarely contend
//! on the same lock. Buckets expire with their window; a per-shard cap with
//! oldest-first eviction bounds memory.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

const DEFAULT_SHARD_COUNT: usize = 16;
const MAX_BUCKETS_PER_SHARD: usize = 10_000;
const WINDOW_SECONDS: u64 = 60;

#[derive(Clone)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn new() -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + Duration::from_secs(WINDOW_SECONDS),
        }
    }

    fn check_and_increment(&mut self, limit: u32) -> (bool, u32) {
        let now = Instant::now();

        // Reset if window expired
        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + Duration::from_secs(WINDOW_SECONDS);
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }

    fn reset_in(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// Sharded per-IP rate limiter.
#[derive(Clone)]
pub struct HttpRateLimiter {
    shards: Vec<Arc<Mutex<HashMap<String, RateLimitBucket>>>>,
    shard_count: usize,
    limit_per_minute: u32,
}

impl HttpRateLimiter {
    pub fn new(limit_per_minute: u32) -> Self {
        Self::with_shards(limit_per_minute, DEFAULT_SHARD_COUNT)
    }

    pub fn with_shards(limit_per_minute: u32, shard_count: usize) -> Self {
        let shards = (0..shard_count)
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            shard_count,
            limit_per_minute,
        }
    }

    pub fn limit_per_minute(&self) -> u32 {
        self.limit_per_minute
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shard_count
    }

    /// Returns the remaining budget for this window, or the time until the
    /// window resets when the limit is exhausted.
    pub async fn check_rate_limit(&self, key: &str) -> Result<u32, Duration> {
        let shard = &self.shards[self.shard_index(key)];
        let mut buckets = shard.lock().await;

        if buckets.len() >= MAX_BUCKETS_PER_SHARD {
            let now = Instant::now();
            let grace = Duration::from_secs(WINDOW_SECONDS);
            buckets.retain(|_, bucket| bucket.reset_at > now || (now - bucket.reset_at) < grace);

            // Still at capacity after dropping expired buckets: evict the oldest.
            if buckets.len() >= MAX_BUCKETS_PER_SHARD {
                let oldest_key = buckets
                    .iter()
                    .min_by_key(|(_, bucket)| bucket.reset_at)
                    .map(|(k, _)| k.clone());
                if let Some(key_to_remove) = oldest_key {
                    buckets.remove(&key_to_remove);
                }
            }
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(RateLimitBucket::new);

        let (allowed, remaining) = bucket.check_and_increment(self.limit_per_minute);
        if allowed {
            Ok(remaining)
        } else {
            Err(bucket.reset_in())
        }
    }
}

/// HTTP rate limiting middleware, keyed on the client IP.
///
/// Adds `X-RateLimit-Limit` and `X-RateLimit-Remaining` to every response,
/// and answers `429 Too Many Requests` with `Retry-After` once the budget is
/// spent.
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<HttpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let key = format!("ip:{}", ip);
    let limit = rate_limiter.limit_per_minute();

    match rate_limiter.check_rate_limit(&key).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            insert_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            insert_header(&mut response, "X-RateLimit-Remaining", &remaining.to_string());
            response
        }
        Err(reset_in) => {
            tracing::warn!(key = %key, limit = limit, "Rate limit exceeded");

            let reset_seconds = reset_in.as_secs().max(1);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(serde_json::json!({
                    "error": "Too many requests. Please slow down."
                })),
            )
                .into_response();

            insert_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            insert_header(&mut response, "X-RateLimit-Remaining", "0");
            insert_header(&mut response, "Retry-After", &reset_seconds.to_string());
            response
        }
    }
}

fn insert_header(response: &mut Response, name: &'static str, value: &str) {
    if let Ok(header_value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(name, header_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let limiter = HttpRateLimiter::with_shards(3, 4);

        assert_eq!(limiter.check_rate_limit("ip:1.2.3.4").await, Ok(2));
        assert_eq!(limiter.check_rate_limit("ip:1.2.3.4").await, Ok(1));
        assert_eq!(limiter.check_rate_limit("ip:1.2.3.4").await, Ok(0));
        assert!(limiter.check_rate_limit("ip:1.2.3.4").await.is_err());
    }

    #[tokio::test]
    async fn keys_are_limited_independently() {
        let limiter = HttpRateLimiter::with_shards(1, 4);

        assert!(limiter.check_rate_limit("ip:1.1.1.1").await.is_ok());
        assert!(limiter.check_rate_limit("ip:1.1.1.1").await.is_err());
        assert!(limiter.check_rate_limit("ip:2.2.2.2").await.is_ok());
    }

    #[test]
    fn bucket_resets_after_window() {
        let mut bucket = RateLimitBucket::new();
        let (allowed, _) = bucket.check_and_increment(1);
        assert!(allowed);
        let (allowed, _) = bucket.check_and_increment(1);
        assert!(!allowed);

        // Force the window to expire.
        bucket.reset_at = Instant::now() - Duration::from_secs(1);
        let (allowed, _) = bucket.check_and_increment(1);
        assert!(allowed);
    }
}
