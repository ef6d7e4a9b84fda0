use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::utils::ApiResponse;

#[derive(Clone)]
pub struct RateLimitConfig {
    pub requests_per_window: u32,
    pub window_duration: Duration,
}

impl RateLimitConfig {
    pub fn per_minute(requests: u32) -> Self {
        Self {
            requests_per_window: requests,
            window_duration: Duration::from_secs(60),
        }
    }
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window per-key counter. The check is synchronous so requests over the
/// limit are rejected before reaching the handler.
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            // A poisoned lock means a panic elsewhere; fail open.
            Err(poisoned) => poisoned.into_inner(),
        };

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= self.config.window_duration {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.config.requests_per_window {
            return false;
        }

        entry.count += 1;
        true
    }

    pub fn cleanup_old_entries(&self) {
        let now = Instant::now();
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.retain(|_, entry| {
            now.duration_since(entry.window_start) < self.config.window_duration * 2
        });
    }
}

pub struct RateLimitMiddleware {
    limiter: Arc<RateLimiter>,
}

impl RateLimitMiddleware {
    /// Share one limiter across workers so the quota is process-wide.
    pub fn with_limiter(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        })
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        if !self.limiter.check(&client_ip) {
            let response = HttpResponse::TooManyRequests().json(ApiResponse::<()>::error(
                "Rate limit exceeded. Please try again later.",
            ));
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

pub fn spawn_cleanup_task(limiter: Arc<RateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            limiter.cleanup_old_entries();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_blocks_after_window_quota() {
        let limiter = RateLimiter::new(RateLimitConfig::per_minute(3));
        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1"));
        }
        assert!(!limiter.check("10.0.0.1"));
        // Other keys have their own window.
        assert!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn cleanup_keeps_recent_entries() {
        let limiter = RateLimiter::new(RateLimitConfig::per_minute(1));
        assert!(limiter.check("10.0.0.1"));
        limiter.cleanup_old_entries();
        // Entry is still within the window, so the quota still applies.
        assert!(!limiter.check("10.0.0.1"));
    }
}
