//! Sliding-window request limiter keyed by client identity.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-client sliding-window rate limiter.
///
/// Owned by whoever serves requests; the analysis engine never consults it.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// `max_requests` per minute.
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Record a request at `now` if the client is under its limit.
    ///
    /// Requests at least one window older than `now` no longer count.
    pub fn is_allowed(&self, client_id: &str, now: Instant) -> bool {
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        prune(&mut requests, now, self.window);
        let history = requests.entry(client_id.to_string()).or_default();

        if history.len() < self.max_requests {
            history.push(now);
            return true;
        }

        tracing::debug!(client_id, limit = self.max_requests, "rate limit reached");
        if history.is_empty() {
            requests.remove(client_id);
        }
        false
    }

    /// Forget every client with no requests left in the window at `now`.
    pub fn sweep(&self, now: Instant) {
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        prune(&mut requests, now, self.window);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        match self.requests.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Number of requests currently counted for a client.
    pub fn in_window(&self, client_id: &str) -> usize {
        match self.requests.lock() {
            Ok(guard) => guard.get(client_id).map_or(0, Vec::len),
            Err(poisoned) => poisoned.into_inner().get(client_id).map_or(0, Vec::len),
        }
    }
}

/// Drop expired timestamps, then clients left with none.
fn prune(requests: &mut HashMap<String, Vec<Instant>>, now: Instant, window: Duration) {
    requests.retain(|_, history| {
        history.retain(|&at| now.saturating_duration_since(at) < window);
        !history.is_empty()
    });
}
