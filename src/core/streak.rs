//! Cooldown and streak arithmetic.
//!
//! Pure functions over UTC instants. The cooldown is measured in elapsed time,
//! streak continuation in calendar days.

use chrono::{DateTime, Duration, Utc};

/// Amount credited by a successful daily claim.
pub const DAILY_REWARD: i64 = 100;

/// Minimum time between successful claims.
pub const DAILY_COOLDOWN: Duration = Duration::hours(24);

/// Time left before another claim is allowed, or `None` if eligible now.
#[must_use]
pub fn cooldown_remaining(
    last_claim_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let elapsed = now - last_claim_at?;
    (elapsed < DAILY_COOLDOWN).then(|| DAILY_COOLDOWN - elapsed)
}

/// Streak after a successful claim at `now`.
///
/// Continues only when `now` falls on the calendar day (UTC) right after the
/// previous claim, however few hours apart they are. Anything else restarts at 1.
#[must_use]
pub fn next_streak(last_claim_at: Option<DateTime<Utc>>, current: i32, now: DateTime<Utc>) -> i32 {
    match last_claim_at {
        Some(last) if (now.date_naive() - last.date_naive()).num_days() == 1 => {
            current.saturating_add(1)
        }
        _ => 1,
    }
}

/// Whole seconds to wait, rounded up so waiting that long is always enough.
#[must_use]
pub fn retry_after_seconds(remaining: Duration) -> i64 {
    let seconds = remaining.num_seconds();
    if remaining > Duration::seconds(seconds) {
        seconds + 1
    } else {
        seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utc as at;

    #[test]
    fn test_no_prior_claim_is_eligible() {
        assert_eq!(cooldown_remaining(None, at(2024, 3, 1, 12, 0)), None);
    }

    #[test]
    fn test_cooldown_remaining_within_window() {
        let last = at(2024, 3, 1, 12, 0);
        let remaining = cooldown_remaining(Some(last), at(2024, 3, 1, 13, 0));
        assert_eq!(remaining, Some(Duration::hours(23)));
    }

    #[test]
    fn test_cooldown_boundary_is_eligible() {
        let last = at(2024, 3, 1, 12, 0);
        assert_eq!(cooldown_remaining(Some(last), last + DAILY_COOLDOWN), None);
        assert_eq!(
            cooldown_remaining(Some(last), last + DAILY_COOLDOWN - Duration::seconds(1)),
            Some(Duration::seconds(1))
        );
    }

    #[test]
    fn test_first_claim_starts_streak() {
        assert_eq!(next_streak(None, 0, at(2024, 3, 1, 12, 0)), 1);
    }

    #[test]
    fn test_next_day_continues_streak() {
        let last = at(2024, 3, 1, 12, 0);
        assert_eq!(next_streak(Some(last), 4, at(2024, 3, 2, 13, 0)), 5);
    }

    #[test]
    fn test_midnight_crossing_counts_as_next_day() {
        let last = at(2024, 3, 1, 23, 59);
        assert_eq!(next_streak(Some(last), 2, at(2024, 3, 2, 0, 1)), 3);
    }

    #[test]
    fn test_month_and_year_boundaries_continue_streak() {
        assert_eq!(next_streak(Some(at(2024, 2, 29, 8, 0)), 1, at(2024, 3, 1, 9, 0)), 2);
        assert_eq!(next_streak(Some(at(2023, 12, 31, 8, 0)), 9, at(2024, 1, 1, 9, 0)), 10);
    }

    #[test]
    fn test_gap_resets_streak() {
        let last = at(2024, 3, 1, 12, 0);
        assert_eq!(next_streak(Some(last), 7, at(2024, 3, 3, 12, 0)), 1);
        assert_eq!(next_streak(Some(last), 7, at(2024, 3, 4, 20, 0)), 1);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_seconds(Duration::hours(23)), 82_800);
        assert_eq!(retry_after_seconds(Duration::milliseconds(1_500)), 2);
        assert_eq!(retry_after_seconds(Duration::milliseconds(1)), 1);
    }
}
