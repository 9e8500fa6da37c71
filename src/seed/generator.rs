//! Synthetic activity history and outcomes for test data.
//!
//! Generation is driven by a caller-supplied `ChaCha8Rng`, so the same seed and the same
//! `now` always produce the same rows.

use crate::models::{Activity, Outcome, OutcomeType};
use chrono::{DateTime, Duration, Months, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Number of trailing days covered by generated history.
pub const HISTORY_DAYS: i64 = 365;

/// Probability that a given day has an activity row.
const ACTIVE_DAY_PROBABILITY: f64 = 0.5;

/// Exclusive upper bound for a day's time delta and for external ids.
const MAX_TIME_DELTA: i64 = 1000;

pub const ACTIVITY_TYPE: &str = "interaction";

/// One year of daily activity for a user in a program, starting one year before `now`.
/// Each day is included with probability 0.5; `total_time` is the running sum of deltas.
pub fn activity_history(
    rng: &mut ChaCha8Rng,
    user_id: i64,
    program_id: i64,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    let year_ago = now
        .checked_sub_months(Months::new(12))
        .unwrap_or(now - Duration::days(HISTORY_DAYS));
    let mut total_time = 0;
    let mut rows = Vec::new();
    for day in 0..HISTORY_DAYS {
        if !rng.random_bool(ACTIVE_DAY_PROBABILITY) {
            continue;
        }
        let time_delta = rng.random_range(0..MAX_TIME_DELTA);
        total_time += time_delta;
        rows.push(Activity {
            id: 0,
            user_id,
            program_id,
            activity_type: ACTIVITY_TYPE.to_string(),
            total_time,
            time_delta,
            external_id: rng.random_range(0..MAX_TIME_DELTA).to_string(),
            created_at: year_ago + Duration::days(day),
        });
    }
    rows
}

/// One outcome with a uniformly chosen type.
pub fn outcome(rng: &mut ChaCha8Rng, user_id: i64, program_id: i64) -> Outcome {
    let outcome_type = *OutcomeType::ALL
        .choose(rng)
        .unwrap_or(&OutcomeType::Completion);
    Outcome {
        id: 0,
        user_id,
        program_id,
        outcome_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn same_seed_same_history() {
        let a = activity_history(&mut ChaCha8Rng::seed_from_u64(7), 1, 2, now());
        let b = activity_history(&mut ChaCha8Rng::seed_from_u64(7), 1, 2, now());
        assert_eq!(a, b);
        let c = activity_history(&mut ChaCha8Rng::seed_from_u64(8), 1, 2, now());
        assert_ne!(a, c);
    }

    #[test]
    fn history_stays_within_the_trailing_year() {
        let rows = activity_history(&mut ChaCha8Rng::seed_from_u64(1), 4, 9, now());
        assert!(!rows.is_empty());
        assert!(rows.len() <= HISTORY_DAYS as usize);
        let start = Utc.with_ymd_and_hms(2025, 10, 16, 12, 0, 0).unwrap();
        for row in &rows {
            assert!(row.created_at >= start && row.created_at < now());
            assert!((0..MAX_TIME_DELTA).contains(&row.time_delta));
            assert_eq!(row.user_id, 4);
            assert_eq!(row.program_id, 9);
            assert_eq!(row.activity_type, ACTIVITY_TYPE);
        }
    }

    #[test]
    fn roughly_half_the_days_are_active() {
        let rows = activity_history(&mut ChaCha8Rng::seed_from_u64(1234), 1, 1, now());
        assert!((120..=245).contains(&rows.len()), "got {} active days", rows.len());
    }

    #[test]
    fn total_time_is_running_sum() {
        let rows = activity_history(&mut ChaCha8Rng::seed_from_u64(3), 1, 1, now());
        let mut sum = 0;
        for row in &rows {
            sum += row.time_delta;
            assert_eq!(row.total_time, sum);
        }
    }

    #[test]
    fn days_are_distinct_and_ascending() {
        let rows = activity_history(&mut ChaCha8Rng::seed_from_u64(5), 1, 1, now());
        assert!(rows.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[test]
    fn outcome_is_deterministic_for_seed() {
        let a = outcome(&mut ChaCha8Rng::seed_from_u64(11), 1, 2);
        let b = outcome(&mut ChaCha8Rng::seed_from_u64(11), 1, 2);
        assert_eq!(a, b);
        assert_eq!((a.user_id, a.program_id), (1, 2));
    }
}
