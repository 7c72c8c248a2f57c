/**
 * Cooldown Countdown
 *
 * Local mirror of the server's cooldown for one participant. The session
 * arms it whenever the server answers a write (accepted or rate limited) and
 * checks it before sending the next one, so a write that would obviously be
 * refused never leaves the client.
 *
 * Uses `tokio::time::Instant` so paused-clock tests can drive it.
 */
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Countdown {
    #[default]
    Idle,
    Counting { ends_at: Instant },
}

/// Result of advancing the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Nothing to count
    Idle,
    /// Still waiting
    Running { remaining: Duration },
    /// Reached its end on this tick
    Finished,
}

impl Countdown {
    /// Start (or restart) counting `seconds` from `now`
    pub fn arm(&mut self, now: Instant, seconds: u64) {
        *self = if seconds == 0 {
            Countdown::Idle
        } else {
            Countdown::Counting {
                ends_at: now + Duration::from_secs(seconds),
            }
        };
    }

    /// Time left, or `None` once the end has passed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self {
            Countdown::Idle => None,
            Countdown::Counting { ends_at } if now >= *ends_at => None,
            Countdown::Counting { ends_at } => Some(*ends_at - now),
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.remaining(now).is_some()
    }

    /// Advance to `now`, dropping back to `Idle` once the end is reached
    pub fn tick(&mut self, now: Instant) -> CountdownTick {
        match *self {
            Countdown::Idle => CountdownTick::Idle,
            Countdown::Counting { ends_at } if now >= ends_at => {
                *self = Countdown::Idle;
                CountdownTick::Finished
            }
            Countdown::Counting { ends_at } => CountdownTick::Running {
                remaining: ends_at - now,
            },
        }
    }
}

/// Whole seconds left, rounded up so "0" is only shown once the wait is over
pub fn remaining_seconds(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Format a remaining wait as `MM:SS`
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining_seconds(remaining);
    format!("{:02}:{:02}", total / 60, total % 60)
}
