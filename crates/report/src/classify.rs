//! Activity status classification.

use chrono::Duration;

use crate::types::{ActivityStatus, Threshold, Timestamp};

/// Classifies a user's latest activity against the threshold.
///
/// - No recorded activity → [`ActivityStatus::NeverActive`].
/// - `now − last ≤ threshold` days → [`ActivityStatus::Active`]. The boundary
///   is inclusive: activity exactly `threshold` days old still counts as
///   active.
/// - Otherwise → [`ActivityStatus::Inactive`].
///
/// A timestamp in the future (clock skew between the remote service and this
/// host) yields a negative age and is therefore active without any
/// special-casing.
pub fn classify(last: Option<Timestamp>, threshold: Threshold, now: Timestamp) -> ActivityStatus {
    let Some(last) = last else {
        return ActivityStatus::NeverActive;
    };
    let age = now.as_datetime() - last.as_datetime();
    if age <= Duration::days(i64::from(threshold.as_days())) {
        ActivityStatus::Active
    } else {
        ActivityStatus::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32, h: u32) -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap())
    }

    const NOW: (i32, u32, u32, u32) = (2024, 7, 1, 12);

    fn now() -> Timestamp {
        ts(NOW.0, NOW.1, NOW.2, NOW.3)
    }

    fn sixty() -> Threshold {
        Threshold::new(60).unwrap()
    }

    #[test]
    fn absence_is_never_active() {
        assert_eq!(classify(None, sixty(), now()), ActivityStatus::NeverActive);
    }

    #[test]
    fn boundary_is_inclusive() {
        // Exactly 60 days before `now`.
        let boundary = ts(2024, 5, 2, 12);
        assert_eq!(
            classify(Some(boundary), sixty(), now()),
            ActivityStatus::Active
        );
        // One hour older than the boundary tips over.
        let stale = ts(2024, 5, 2, 11);
        assert_eq!(
            classify(Some(stale), sixty(), now()),
            ActivityStatus::Inactive
        );
    }

    #[test]
    fn future_timestamps_count_as_active() {
        let skewed = ts(2024, 7, 3, 0);
        assert_eq!(
            classify(Some(skewed), sixty(), now()),
            ActivityStatus::Active
        );
    }

    #[test]
    fn recency_ordering_is_monotonic() {
        // If one timestamp is more recent than another, its status is never
        // "more inactive".
        let rank = |s: ActivityStatus| match s {
            ActivityStatus::Active => 2,
            ActivityStatus::Inactive => 1,
            ActivityStatus::NeverActive => 0,
        };
        let samples = [
            ts(2024, 6, 30, 0),
            ts(2024, 5, 2, 12),
            ts(2024, 5, 2, 11),
            ts(2023, 12, 25, 0),
        ];
        for newer in samples {
            for older in samples {
                if newer >= older {
                    let a = classify(Some(newer), sixty(), now());
                    let b = classify(Some(older), sixty(), now());
                    assert!(rank(a) >= rank(b), "{newer} vs {older}");
                }
            }
        }
    }
}
