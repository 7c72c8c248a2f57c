/**
 * Cooldown Tracker
 *
 * Per-participant rate limit state. Each participant who has had a write
 * accepted owns one record holding the instant before which further writes
 * are refused.
 *
 * # Concurrency
 *
 * Records live in a `DashMap`. The check and the reservation happen inside a
 * single `entry()` call, which holds the shard lock for that key, so two
 * in-flight requests from the same participant can never both be allowed.
 * Participants hashing to different shards never contend.
 */

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Upper bound on a configured cooldown (one year)
pub const MAX_COOLDOWN_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Result of an atomic check-and-reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The write may proceed; the participant is now restricted until
    /// `next_allowed_at`
    Allowed { next_allowed_at: DateTime<Utc> },
    /// The participant must wait
    Denied { retry_after_seconds: u64 },
}

impl CooldownDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Per-participant cooldown records
#[derive(Debug)]
pub struct CooldownTracker {
    records: DashMap<String, DateTime<Utc>>,
    cooldown: TimeDelta,
}

impl CooldownTracker {
    /// Create a tracker enforcing `cooldown_seconds` between accepted writes
    pub fn new(cooldown_seconds: u64) -> Self {
        let seconds = cooldown_seconds.min(MAX_COOLDOWN_SECONDS) as i64;
        Self {
            records: DashMap::new(),
            cooldown: TimeDelta::seconds(seconds),
        }
    }

    /// Cooldown length in whole seconds
    pub fn cooldown_seconds(&self) -> u64 {
        u64::try_from(self.cooldown.num_seconds()).unwrap_or(0)
    }

    /// Decide whether `participant` may write at `now`, reserving the slot if so
    ///
    /// A missing record, or `now >= next_allowed_at`, is allowed and moves
    /// `next_allowed_at` to `now + cooldown`. Otherwise the call is denied
    /// with the remaining wait rounded up to whole seconds.
    pub fn check_and_reserve(&self, participant: &str, now: DateTime<Utc>) -> CooldownDecision {
        let next_allowed_at = now + self.cooldown;

        match self.records.entry(participant.to_string()) {
            Entry::Occupied(mut entry) => {
                let restricted_until = *entry.get();
                if now >= restricted_until {
                    entry.insert(next_allowed_at);
                    CooldownDecision::Allowed { next_allowed_at }
                } else {
                    CooldownDecision::Denied {
                        retry_after_seconds: ceil_seconds(restricted_until - now),
                    }
                }
            }
            Entry::Vacant(entry) => {
                tracing::debug!(participant = %participant, "[Cooldown] First write from participant");
                entry.insert(next_allowed_at);
                CooldownDecision::Allowed { next_allowed_at }
            }
        }
    }

    /// When `participant` may next write, if they have a record
    pub fn next_allowed_at(&self, participant: &str) -> Option<DateTime<Utc>> {
        self.records.get(participant).map(|record| *record)
    }

    /// Drop records that expired at least `idle_for` before `now`
    ///
    /// Only expired records are removed, and an absent record means "not
    /// restricted", so eviction never changes a decision.
    pub fn evict_idle(&self, now: DateTime<Utc>, idle_for: TimeDelta) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, next_allowed_at| *next_allowed_at + idle_for > now);
        let evicted = before.saturating_sub(self.records.len());
        if evicted > 0 {
            tracing::debug!(evicted, "[Cooldown] Evicted idle cooldown records");
        }
        evicted
    }

    /// Number of participants currently tracked
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Whole seconds, rounded up; any positive remainder counts as a full second
fn ceil_seconds(remaining: TimeDelta) -> u64 {
    let seconds = remaining.num_seconds();
    let seconds = if remaining.subsec_nanos() > 0 {
        seconds.saturating_add(1)
    } else {
        seconds
    };
    u64::try_from(seconds).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    #[test]
    fn test_first_write_allowed() {
        let tracker = CooldownTracker::new(60);
        assert!(tracker.is_empty());

        let decision = tracker.check_and_reserve("alice", at(0));
        assert_eq!(decision, CooldownDecision::Allowed { next_allowed_at: at(60) });
        assert_eq!(tracker.next_allowed_at("alice"), Some(at(60)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_write_inside_window_denied() {
        let tracker = CooldownTracker::new(60);
        tracker.check_and_reserve("alice", at(0));

        assert_eq!(
            tracker.check_and_reserve("alice", at(10)),
            CooldownDecision::Denied { retry_after_seconds: 50 }
        );
        // A denial must not push the window further out
        assert_eq!(tracker.next_allowed_at("alice"), Some(at(60)));
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let tracker = CooldownTracker::new(60);
        tracker.check_and_reserve("alice", at(0));

        let now = at(10) + TimeDelta::milliseconds(1);
        assert_matches!(
            tracker.check_and_reserve("alice", now),
            CooldownDecision::Denied { retry_after_seconds: 50 }
        );

        let now = at(59) + TimeDelta::milliseconds(999);
        assert_matches!(
            tracker.check_and_reserve("alice", now),
            CooldownDecision::Denied { retry_after_seconds: 1 }
        );
    }

    #[test]
    fn test_sub_millisecond_remainder_still_waits_a_second() {
        let tracker = CooldownTracker::new(60);
        tracker.check_and_reserve("alice", at(0));

        let now = at(60) - TimeDelta::microseconds(500);
        assert_eq!(
            tracker.check_and_reserve("alice", now),
            CooldownDecision::Denied { retry_after_seconds: 1 }
        );

        let now = at(60) - TimeDelta::nanoseconds(1);
        assert_eq!(
            tracker.check_and_reserve("alice", now),
            CooldownDecision::Denied { retry_after_seconds: 1 }
        );
        assert_eq!(tracker.next_allowed_at("alice"), Some(at(60)));
    }

    #[test]
    fn test_write_at_window_end_allowed() {
        let tracker = CooldownTracker::new(60);
        tracker.check_and_reserve("alice", at(0));

        assert!(tracker.check_and_reserve("alice", at(60)).is_allowed());
        assert_eq!(tracker.next_allowed_at("alice"), Some(at(120)));
    }

    #[test]
    fn test_participants_are_independent() {
        let tracker = CooldownTracker::new(60);
        assert!(tracker.check_and_reserve("alice", at(0)).is_allowed());
        assert!(tracker.check_and_reserve("bob", at(1)).is_allowed());
        assert!(!tracker.check_and_reserve("alice", at(2)).is_allowed());
    }

    #[test]
    fn test_evict_idle_only_removes_expired() {
        let tracker = CooldownTracker::new(60);
        tracker.check_and_reserve("alice", at(0));
        tracker.check_and_reserve("bob", at(100));

        // alice expired at 60, bob restricted until 160
        let evicted = tracker.evict_idle(at(130), TimeDelta::seconds(30));
        assert_eq!(evicted, 1);
        assert!(tracker.next_allowed_at("alice").is_none());
        assert_eq!(tracker.next_allowed_at("bob"), Some(at(160)));

        // Eviction is invisible to the participant
        assert!(tracker.check_and_reserve("alice", at(130)).is_allowed());
    }

    #[test]
    fn test_concurrent_reservations_allow_one() {
        let tracker = Arc::new(CooldownTracker::new(60));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.check_and_reserve("alice", at(0)).is_allowed())
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|allowed| *allowed)
            .count();
        assert_eq!(allowed, 1);
    }
}
