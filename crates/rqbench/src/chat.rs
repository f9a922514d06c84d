//! Simulated chat traffic against the sliding-window limiter

use std::thread;
use std::time::Duration;
use rand::Rng;
use ratelimit::SlidingWindowRateLimiter;

/// Outcome of one simulated message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageOutcome {
    /// Sequence number of the message
    pub message_id: u32,
    /// Sender
    pub user_id: String,
    /// Whether the limiter accepted it
    pub accepted: bool,
    /// Wait reported right after the attempt
    pub wait: Duration,
}

/// Users rotate through 1..=5 as `message_id % 5 + 1`
pub fn user_for(message_id: u32) -> String {
    (message_id % 5 + 1).to_string()
}

/// Send messages `ids` one by one, sleeping a random 0.1-1.0s between them
///
/// `on_message` sees every outcome as it happens.
pub fn run_round<R, F>(
    limiter: &mut SlidingWindowRateLimiter,
    ids: std::ops::RangeInclusive<u32>,
    rng: &mut R,
    jitter: bool,
    mut on_message: F,
) -> Vec<MessageOutcome>
where
    R: Rng + ?Sized,
    F: FnMut(&MessageOutcome),
{
    let mut outcomes = Vec::new();

    for message_id in ids {
        let user_id = user_for(message_id);
        let accepted = limiter.record_message(&user_id);
        let wait = limiter.time_until_next_allowed(&user_id);

        let outcome = MessageOutcome {
            message_id,
            user_id,
            accepted,
            wait,
        };
        on_message(&outcome);
        outcomes.push(outcome);

        if jitter {
            thread::sleep(Duration::from_secs_f64(rng.gen_range(0.1..1.0)));
        }
    }

    outcomes
}

/// One console line per message
pub fn format_outcome(outcome: &MessageOutcome) -> String {
    let verdict = if outcome.accepted {
        "accepted".to_owned()
    } else {
        format!("rejected (wait {:.1}s)", outcome.wait.as_secs_f64())
    };
    format!(
        "Message {:2} | User {} | {}",
        outcome.message_id, outcome.user_id, verdict
    )
}
