use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window request limiter keyed by client IP. State is a timestamp
/// list per key, pruned on every check.
#[derive(Debug, Clone)]
pub struct IpRateLimiter {
    hits: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    window: Duration,
    max_requests: usize,
}

impl IpRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            hits: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut guard = self.hits.lock();

        // Prune expired hits everywhere and drop keys that went quiet, so
        // the map does not grow with every distinct client ever seen.
        guard.retain(|_, timestamps| {
            timestamps.retain(|at| now.duration_since(*at) <= self.window);
            !timestamps.is_empty()
        });

        let timestamps = guard.entry(key.to_string()).or_default();

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push(now);
        true
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.hits.lock().len()
    }
}
