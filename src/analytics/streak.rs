use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of most recent workouts the streak walk looks at.
pub const STREAK_LOOKBACK: i64 = 30;

/// Aggregate counters shown alongside most pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_workouts: i64,
    pub current_streak: u32,
    pub personal_records: i64,
}

/// Consecutive training days ending today or yesterday.
///
/// `dates` are workout completion dates in any order; several workouts on one
/// day count once. Dates after `today` are ignored.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut days: Vec<NaiveDate> = dates.iter().copied().filter(|d| *d <= today).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for day in days {
        let matches = match expected {
            None => day == today || day == today - Duration::days(1),
            Some(next) => day == next,
        };
        if !matches {
            break;
        }
        streak += 1;
        expected = Some(day - Duration::days(1));
    }

    streak
}
