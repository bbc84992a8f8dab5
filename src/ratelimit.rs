use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Opaque allow/deny gate consulted before rate-limited work proceeds.
pub trait RateLimitGate: Send + Sync {
    fn allow(&self, key: &str) -> bool;
}

/// In-process sliding-window counter keyed by caller-supplied identifier,
/// typically `endpoint:client-ip`.
pub struct SlidingWindowLimiter {
    max_requests: u32,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }
}

impl RateLimitGate for SlidingWindowLimiter {
    fn allow(&self, key: &str) -> bool {
        let mut hits = match self.hits.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        hits.retain(|_, stamps| {
            stamps.retain(|stamp| now.duration_since(*stamp) < self.window);
            !stamps.is_empty()
        });

        let stamps = hits.entry(key.to_string()).or_default();
        if stamps.len() as u32 >= self.max_requests {
            return false;
        }

        stamps.push(now);
        true
    }
}

/// Rate-limit identifier in the `endpoint:client-ip` shape the site's API
/// routes use. Falls back to `anonymous` when no forwarding header is set.
pub fn client_key(endpoint: &str, headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("anonymous");
    format!("{endpoint}:{ip}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_once_budget_is_spent() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(3600));
        assert!(limiter.allow("contact:1.2.3.4"));
        assert!(limiter.allow("contact:1.2.3.4"));
        assert!(!limiter.allow("contact:1.2.3.4"));
    }

    #[test]
    fn keys_are_tracked_independently() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(3600));
        assert!(limiter.allow("contact:1.2.3.4"));
        assert!(limiter.allow("contact:5.6.7.8"));
        assert!(!limiter.allow("contact:1.2.3.4"));
    }

    #[test]
    fn window_expiry_frees_budget() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.allow("quote:1.2.3.4"));
        assert!(!limiter.allow("quote:1.2.3.4"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(limiter.allow("quote:1.2.3.4"));
    }

    #[test]
    fn client_key_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.1.1.1, 172.16.0.9".parse().unwrap());
        assert_eq!(client_key("contact", &headers), "contact:10.1.1.1");
        assert_eq!(client_key("quote", &HeaderMap::new()), "quote:anonymous");
    }
}
