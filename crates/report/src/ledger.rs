//! The per-run activity ledger.
//!
//! The ledger is the in-memory merge structure at the heart of a report run:
//! it maps each user to the latest timestamp observed for them across every
//! source. It is rebuilt from empty for each organization and never shared
//! across organizations.

use std::collections::HashMap;

use crate::identifiers::UserLogin;
use crate::types::{ActivityEvent, Timestamp};

/// Per-user maximum-timestamp merge map.
///
/// Invariant: the stored timestamp for a user is always the maximum of all
/// event timestamps observed for them so far, monotonically non-decreasing
/// and never overwritten with an older value. `record` is therefore idempotent
/// and order-independent: any permutation of the same events produces the
/// same final state.
///
/// Insertion order is tracked so report output is deterministic for a given
/// event stream. No eviction, no TTL; the ledger's lifetime equals one
/// organization's processing pass.
#[derive(Debug, Default)]
pub struct ActivityLedger {
    latest: HashMap<UserLogin, Timestamp>,
    order: Vec<UserLogin>,
}

impl ActivityLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation, keeping the later of the stored and offered
    /// timestamps.
    ///
    /// Returns `true` if the ledger changed (new user, or a strictly later
    /// timestamp).
    pub fn record(&mut self, user: UserLogin, timestamp: Timestamp) -> bool {
        match self.latest.get_mut(&user) {
            Some(stored) => {
                if timestamp > *stored {
                    *stored = timestamp;
                    true
                } else {
                    false
                }
            }
            None => {
                self.order.push(user.clone());
                self.latest.insert(user, timestamp);
                true
            }
        }
    }

    /// Consumes one [`ActivityEvent`] into the ledger.
    pub fn record_event(&mut self, event: ActivityEvent) -> bool {
        self.record(event.user, event.timestamp)
    }

    /// Returns the recorded timestamp for `user`, if any.
    pub fn get(&self, user: &UserLogin) -> Option<Timestamp> {
        self.latest.get(user).copied()
    }

    /// Returns `true` if `user` has at least one recorded observation.
    pub fn contains(&self, user: &UserLogin) -> bool {
        self.latest.contains_key(user)
    }

    /// Number of distinct users recorded.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no observations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&UserLogin, Timestamp)> {
        self.order.iter().map(|user| (user, self.latest[user]))
    }

    /// Returns the current mapping as owned pairs, in first-insertion order.
    pub fn snapshot(&self) -> Vec<(UserLogin, Timestamp)> {
        self.iter().map(|(user, ts)| (user.clone(), ts)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn day(d: u32) -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap())
    }

    fn login(name: &str) -> UserLogin {
        UserLogin::new(name).unwrap()
    }

    #[test]
    fn keeps_the_maximum_timestamp() {
        let mut ledger = ActivityLedger::new();
        assert!(ledger.record(login("alice"), day(10)));
        assert!(!ledger.record(login("alice"), day(3)));
        assert!(ledger.record(login("alice"), day(20)));
        assert_eq!(ledger.get(&login("alice")), Some(day(20)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn re_recording_the_same_event_changes_nothing() {
        let mut ledger = ActivityLedger::new();
        ledger.record(login("alice"), day(10));
        assert!(!ledger.record(login("alice"), day(10)));
        assert_eq!(ledger.get(&login("alice")), Some(day(10)));
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut ledger = ActivityLedger::new();
        ledger.record(login("carol"), day(5));
        ledger.record(login("alice"), day(9));
        ledger.record(login("bob"), day(1));
        // A later update must not reorder carol.
        ledger.record(login("carol"), day(28));

        let users: Vec<_> = ledger.iter().map(|(u, _)| u.as_str().to_string()).collect();
        assert_eq!(users, ["carol", "alice", "bob"]);
    }

    proptest! {
        // Any permutation of the same events yields the same final mapping.
        #[test]
        fn record_is_order_independent(
            events in proptest::collection::vec((0usize..4, 1u32..28), 1..40),
            seed in any::<u64>(),
        ) {
            let names = ["alice", "bob", "carol", "dave"];
            let mut shuffled = events.clone();
            // Deterministic Fisher-Yates driven by the seed.
            let mut state = seed | 1;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }

            let mut a = ActivityLedger::new();
            let mut b = ActivityLedger::new();
            for &(who, d) in &events {
                a.record(login(names[who]), day(d));
            }
            for &(who, d) in &shuffled {
                b.record(login(names[who]), day(d));
            }

            for name in names {
                prop_assert_eq!(a.get(&login(name)), b.get(&login(name)));
            }
            prop_assert_eq!(a.len(), b.len());
        }

        // The stored value equals the maximum over the user's events.
        #[test]
        fn stored_value_is_the_maximum(
            days in proptest::collection::vec(1u32..28, 1..30),
        ) {
            let mut ledger = ActivityLedger::new();
            for &d in &days {
                ledger.record(login("alice"), day(d));
            }
            let expected = day(*days.iter().max().unwrap());
            prop_assert_eq!(ledger.get(&login("alice")), Some(expected));
        }
    }
}
