//! # ratelimit
//!
//! Per-user sliding-window rate limiter for chat-style message streams.
//!
//! Each user keeps a queue of the instants at which their accepted messages
//! were recorded. Entries older than the window are dropped lazily on every
//! call, and users whose queue runs empty are forgotten entirely.
//!
//! Every method has an `_at` twin taking the current [`Instant`] explicitly;
//! the plain variants read the system clock.

#![warn(missing_docs)]

mod error;

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use ahash::RandomState;
use tracing::debug;

pub use error::{Error, Result};

/// Default window size
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

/// Default number of messages allowed per window
pub const DEFAULT_MAX_REQUESTS: usize = 1;

/// Sliding-window limiter keyed by user id
pub struct SlidingWindowRateLimiter {
    window: Duration,
    max_requests: usize,
    user_messages: HashMap<String, VecDeque<Instant>, RandomState>,
}

impl SlidingWindowRateLimiter {
    /// Create a limiter allowing `max_requests` messages per `window`
    ///
    /// # Errors
    /// * `Error::ZeroWindow` - if `window` is zero
    /// * `Error::ZeroRequests` - if `max_requests` is 0
    pub fn new(window: Duration, max_requests: usize) -> Result<Self> {
        if window.is_zero() {
            return Err(Error::ZeroWindow);
        }
        if max_requests == 0 {
            return Err(Error::ZeroRequests);
        }

        Ok(Self {
            window,
            max_requests,
            user_messages: HashMap::with_hasher(RandomState::new()),
        })
    }

    /// Window size
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Messages allowed per window
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Whether `user_id` may send a message right now
    pub fn can_send_message(&mut self, user_id: &str) -> bool {
        self.can_send_message_at(user_id, Instant::now())
    }

    /// Whether `user_id` may send a message at `now`
    pub fn can_send_message_at(&mut self, user_id: &str, now: Instant) -> bool {
        self.cleanup_window(user_id, now);

        self.user_messages
            .get(user_id)
            .map_or(true, |window| window.len() < self.max_requests)
    }

    /// Record a message from `user_id` if the limit allows it
    ///
    /// Returns `false` (and records nothing) when the user is over the limit.
    pub fn record_message(&mut self, user_id: &str) -> bool {
        self.record_message_at(user_id, Instant::now())
    }

    /// Record a message from `user_id` at `now` if the limit allows it
    pub fn record_message_at(&mut self, user_id: &str, now: Instant) -> bool {
        if !self.can_send_message_at(user_id, now) {
            debug!(user_id, "message rejected by rate limiter");
            return false;
        }

        self.user_messages
            .entry(user_id.to_owned())
            .or_default()
            .push_back(now);
        true
    }

    /// How long `user_id` has to wait before the next message is accepted
    pub fn time_until_next_allowed(&mut self, user_id: &str) -> Duration {
        self.time_until_next_allowed_at(user_id, Instant::now())
    }

    /// How long `user_id` has to wait, measured from `now`
    pub fn time_until_next_allowed_at(&mut self, user_id: &str, now: Instant) -> Duration {
        self.cleanup_window(user_id, now);

        let Some(window) = self.user_messages.get(user_id) else {
            return Duration::ZERO;
        };
        if window.len() < self.max_requests {
            return Duration::ZERO;
        }

        window
            .front()
            .map_or(Duration::ZERO, |&oldest| {
                // A window past the clock's range never expires
                oldest
                    .checked_add(self.window)
                    .map_or(Duration::MAX, |deadline| deadline.saturating_duration_since(now))
            })
    }

    /// Number of users currently holding window state
    pub fn tracked_users(&self) -> usize {
        self.user_messages.len()
    }

    fn cleanup_window(&mut self, user_id: &str, now: Instant) {
        let Some(window) = self.user_messages.get_mut(user_id) else {
            return;
        };

        while window
            .front()
            .is_some_and(|&ts| now.saturating_duration_since(ts) > self.window)
        {
            window.pop_front();
        }

        if window.is_empty() {
            self.user_messages.remove(user_id);
        }
    }
}

impl Default for SlidingWindowRateLimiter {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
            user_messages: HashMap::with_hasher(RandomState::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_rejects_bad_config() {
        assert_eq!(
            SlidingWindowRateLimiter::new(Duration::ZERO, 1).err(),
            Some(Error::ZeroWindow)
        );
        assert_eq!(
            SlidingWindowRateLimiter::new(secs(1.0), 0).err(),
            Some(Error::ZeroRequests)
        );
    }

    #[test]
    fn test_first_message_allowed() {
        let mut limiter = SlidingWindowRateLimiter::default();
        let t0 = Instant::now();

        assert!(limiter.can_send_message_at("1", t0));
        assert_eq!(limiter.time_until_next_allowed_at("1", t0), Duration::ZERO);
        assert!(limiter.record_message_at("1", t0));
        assert_eq!(limiter.tracked_users(), 1);
    }

    #[test]
    fn test_second_message_within_window_rejected() {
        let mut limiter = SlidingWindowRateLimiter::new(secs(10.0), 1).unwrap();
        let t0 = Instant::now();

        assert!(limiter.record_message_at("1", t0));
        assert!(!limiter.record_message_at("1", t0 + secs(3.0)));
        assert_eq!(
            limiter.time_until_next_allowed_at("1", t0 + secs(3.0)),
            secs(7.0)
        );
    }

    #[test]
    fn test_users_are_independent() {
        let mut limiter = SlidingWindowRateLimiter::new(secs(10.0), 1).unwrap();
        let t0 = Instant::now();

        assert!(limiter.record_message_at("1", t0));
        assert!(limiter.record_message_at("2", t0));
        assert!(!limiter.can_send_message_at("1", t0));
        assert_eq!(limiter.tracked_users(), 2);
    }

    #[test]
    fn test_window_expiry_is_strict() {
        let mut limiter = SlidingWindowRateLimiter::new(secs(10.0), 1).unwrap();
        let t0 = Instant::now();

        limiter.record_message_at("1", t0);

        // Exactly one window later the message still counts
        assert!(!limiter.can_send_message_at("1", t0 + secs(10.0)));
        assert!(limiter.can_send_message_at("1", t0 + secs(10.5)));
        // Expired users are forgotten
        assert_eq!(limiter.tracked_users(), 0);
    }

    #[test]
    fn test_multiple_requests_per_window() {
        let mut limiter = SlidingWindowRateLimiter::new(secs(5.0), 3).unwrap();
        let t0 = Instant::now();

        assert!(limiter.record_message_at("u", t0));
        assert!(limiter.record_message_at("u", t0 + secs(1.0)));
        assert_eq!(limiter.time_until_next_allowed_at("u", t0 + secs(1.0)), Duration::ZERO);
        assert!(limiter.record_message_at("u", t0 + secs(2.0)));
        assert!(!limiter.record_message_at("u", t0 + secs(3.0)));

        // Oldest message leaves the window after t0 + 5s
        assert_eq!(limiter.time_until_next_allowed_at("u", t0 + secs(3.0)), secs(2.0));
        assert!(limiter.record_message_at("u", t0 + secs(5.5)));
        assert!(!limiter.can_send_message_at("u", t0 + secs(5.5)));
    }

    #[test]
    fn test_rejected_messages_are_not_recorded() {
        let mut limiter = SlidingWindowRateLimiter::new(secs(10.0), 1).unwrap();
        let t0 = Instant::now();

        limiter.record_message_at("1", t0);
        for i in 1..5 {
            assert!(!limiter.record_message_at("1", t0 + secs(i as f64)));
        }

        // Only the first message ever entered the window
        assert!(limiter.record_message_at("1", t0 + secs(10.1)));
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let mut limiter = SlidingWindowRateLimiter::new(Duration::MAX, 1).unwrap();
        let t0 = Instant::now();

        assert!(limiter.record_message_at("u", t0));
        assert!(!limiter.can_send_message_at("u", t0 + secs(3600.0)));
        assert_eq!(limiter.time_until_next_allowed_at("u", t0), Duration::MAX);
    }

    #[test]
    fn test_unknown_user_wait_is_zero() {
        let mut limiter = SlidingWindowRateLimiter::default();
        assert_eq!(limiter.time_until_next_allowed("nobody"), Duration::ZERO);
        assert!(limiter.can_send_message("nobody"));
        assert_eq!(limiter.tracked_users(), 0);
    }
}
