use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use redis::AsyncCommands;

use crate::{
    config::Config,
    utils::{error_codes, error_to_api_response},
};

/// Fixed-window request counter per client IP, kept in Redis.
#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    config: Arc<Config>,
}

/// `x-real-ip`, then the first `x-forwarded-for` hop, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let peer = peer.map(|addr| addr.ip().to_string());

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(peer.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

/// Redis answers -1 for a key that exists but never expires.
fn needs_expiry(ttl: i64) -> bool {
    ttl == -1
}

impl RateLimiter {
    pub fn new(redis: Arc<redis::Client>, config: Config) -> Self {
        Self {
            redis,
            config: Arc::new(config),
        }
    }

    async fn hit(&self, ip: &str) -> Result<u32, redis::RedisError> {
        let key = format!("rate_limit:{}", ip);
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let (count, ttl): (u32, i64) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .ttl(&key)
            .query_async(&mut conn)
            .await?;
        // also repairs a counter left without an expiry by an earlier failure
        if needs_expiry(ttl) {
            let _: () = conn
                .expire(&key, self.config.rate_limit_window().as_secs() as i64)
                .await?;
        }

        Ok(count)
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        let ip = client_ip(req.headers(), peer);

        match self.hit(&ip).await {
            Ok(count) if count > self.config.rate_limit_requests => {
                tracing::info!("rate limit exceeded for {}", ip);
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    error_to_api_response::<()>(error_codes::RATE_LIMITED),
                )
                    .into_response();
            }
            Ok(_) => {}
            // an unreachable Redis must not take the proxies down with it
            Err(e) => tracing::warn!("rate limiter unavailable, letting {} through: {}", ip, e),
        }

        next.run(req).await
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_real_ip_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.0.0.7".parse().unwrap());
        headers.insert("x-forwarded-for", "10.0.0.8, 10.0.0.9".parse().unwrap());
        assert_eq!(client_ip(&headers, None), "10.0.0.7");
    }

    #[test]
    fn falls_back_to_first_forwarded_hop_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", " 203.0.113.4 , 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers, None), "203.0.113.4");

        let peer: SocketAddr = "192.0.2.1:5555".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "192.0.2.1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn only_keys_without_expiry_get_one() {
        assert!(needs_expiry(-1));
        // -2: key gone, nothing to expire
        assert!(!needs_expiry(-2));
        assert!(!needs_expiry(60));
    }
}
