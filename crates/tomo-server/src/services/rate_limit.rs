//! Fixed-Window Rate Limiter
//!
//! In-process implementation of the `RateLimiter` capability: each caller
//! key gets a counter that resets once its window elapses. Sized for the
//! single-instance deployment this server targets.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tomo::{RateLimitDecision, RateLimiter};

/// Limiter thresholds (configurable via secrets)
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window limiter keyed by caller
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(config: Option<RateLimitConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, user: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");

        let window = windows.entry(user.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.config.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count < self.config.max_requests {
            window.count += 1;
            RateLimitDecision::Allowed
        } else {
            let wait = self.config.window - now.duration_since(window.started_at);
            RateLimitDecision::Denied {
                message: format!(
                    "Too many requests: limit is {} per {}s. Try again in {}s.",
                    self.config.max_requests,
                    self.config.window.as_secs(),
                    wait.as_secs().max(1)
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, window_ms: u64) -> FixedWindowLimiter {
        FixedWindowLimiter::new(Some(RateLimitConfig {
            max_requests: max,
            window: Duration::from_millis(window_ms),
        }))
    }

    #[test]
    fn test_allows_up_to_limit_then_denies() {
        let limiter = limiter(3, 60_000);
        for _ in 0..3 {
            assert_eq!(limiter.check("alice"), RateLimitDecision::Allowed);
        }
        assert!(matches!(
            limiter.check("alice"),
            RateLimitDecision::Denied { .. }
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, 60_000);
        assert_eq!(limiter.check("alice"), RateLimitDecision::Allowed);
        assert_eq!(limiter.check("bob"), RateLimitDecision::Allowed);
        assert!(matches!(
            limiter.check("alice"),
            RateLimitDecision::Denied { .. }
        ));
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1, 20);
        assert_eq!(limiter.check("alice"), RateLimitDecision::Allowed);
        assert!(matches!(
            limiter.check("alice"),
            RateLimitDecision::Denied { .. }
        ));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(limiter.check("alice"), RateLimitDecision::Allowed);
    }

    #[test]
    fn test_denial_message_names_the_limit() {
        let limiter = limiter(1, 60_000);
        limiter.check("alice");
        match limiter.check("alice") {
            RateLimitDecision::Denied { message } => {
                assert!(message.contains("limit is 1 per 60s"));
            }
            RateLimitDecision::Allowed => panic!("expected denial"),
        }
    }
}
