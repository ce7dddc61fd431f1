//! Per-client rate limiting middleware.

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// A simple token bucket rate limiter.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Checks between sweeps of idle buckets.
const SWEEP_INTERVAL: u64 = 1024;

/// Token buckets keyed by client IP.
///
/// Owned by the HTTP layer and injected as middleware state. A bucket left
/// idle long enough to refill completely is dropped on the next sweep; a
/// fresh one is indistinguishable from it.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<IpAddr, TokenBucket>,
    rps: f64,
    burst: f64,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            rps: config.requests_per_second as f64,
            burst: config.burst_size as f64,
            checks: AtomicU64::new(0),
        }
    }

    /// Take one token for `client`. `false` when the bucket is empty.
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        // Sweep before taking an entry guard; retain locks every shard.
        let seen = self.checks.fetch_add(1, Ordering::Relaxed);
        if seen % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.evict_idle(now);
        }

        let mut bucket = self
            .buckets
            .entry(client)
            .or_insert_with(|| TokenBucket::new(self.burst, now));
        bucket.try_acquire(self.burst, self.rps, now)
    }

    /// Time after which an untouched bucket is full again.
    fn refill_window(&self) -> Option<Duration> {
        (self.rps > 0.0).then(|| Duration::from_secs_f64(self.burst / self.rps))
    }

    /// Drop buckets idle for at least a full refill window.
    fn evict_idle(&self, now: Instant) {
        let Some(window) = self.refill_window() else {
            return;
        };
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_update) < window);
        let evicted = before.saturating_sub(self.buckets.len());
        if evicted > 0 {
            tracing::debug!(
                evicted,
                remaining = self.buckets.len(),
                "Evicted idle rate limit buckets"
            );
        }
    }
}

/// Middleware rejecting clients that exhausted their bucket.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let Some(ip) = client else {
        // No peer address (in-process callers); nothing to key on.
        return next.run(request).await;
    };

    if limiter.check(ip) {
        next.run(request).await
    } else {
        tracing::warn!(client = %ip, "Rate limit exceeded");
        metrics::record_rate_limited();
        ApiError::RateLimited.into_response()
    }
}
