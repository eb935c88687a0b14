use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{round1, UserStats};
use crate::models::{CheckIn, Workout};

pub const OVERVIEW_WINDOW_DAYS: i64 = 30;
pub const OVERVIEW_CHECK_IN_LIMIT: i64 = 7;
pub const OVERVIEW_RECENT_WORKOUTS: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressOverview {
    pub stats: UserStats,
    /// Workouts per week, keyed by `week_label`.
    pub weekly_workout_data: BTreeMap<String, u32>,
    pub avg_energy_level: f64,
    pub avg_motivation_level: f64,
    pub recent_workouts: Vec<Workout>,
    /// Percent of the window; exceeds 100 with several workouts per day.
    pub workout_consistency: f64,
}

/// `"{iso_year}-W{week:02}"` for the Monday of the week containing `date`.
pub fn week_label(date: NaiveDate) -> String {
    let week_start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let week = week_start.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

pub fn weekly_histogram(dates: impl IntoIterator<Item = NaiveDate>) -> BTreeMap<String, u32> {
    let mut histogram = BTreeMap::new();
    for date in dates {
        *histogram.entry(week_label(date)).or_insert(0) += 1;
    }
    histogram
}

/// Sum of the present values over the number of check-ins, rounded. Zero when
/// there are no check-ins.
pub fn average_level(check_ins: &[CheckIn], level: impl Fn(&CheckIn) -> Option<i32>) -> f64 {
    if check_ins.is_empty() {
        return 0.0;
    }
    let total: i64 = check_ins.iter().filter_map(|c| level(c)).map(i64::from).sum();
    round1(total as f64 / check_ins.len() as f64)
}

pub fn workout_consistency(workouts_in_window: usize) -> f64 {
    workouts_in_window as f64 / OVERVIEW_WINDOW_DAYS as f64 * 100.0
}

/// `workouts` are the window's workouts newest first, `check_ins` the most
/// recent check-ins of the same window.
pub fn build_overview(
    stats: UserStats,
    workouts: Vec<Workout>,
    check_ins: &[CheckIn],
) -> ProgressOverview {
    let weekly_workout_data = weekly_histogram(workouts.iter().map(|w| w.date_completed));
    let workout_consistency = workout_consistency(workouts.len());

    ProgressOverview {
        stats,
        weekly_workout_data,
        avg_energy_level: average_level(check_ins, |c| c.energy_level),
        avg_motivation_level: average_level(check_ins, |c| c.motivation_level),
        recent_workouts: workouts.into_iter().take(OVERVIEW_RECENT_WORKOUTS).collect(),
        workout_consistency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn workout(on: NaiveDate) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            workout_name: "Session".to_string(),
            workout_type: Some("strength".to_string()),
            date_completed: on,
            duration_minutes: Some(60),
            exercises: None,
            notes: None,
            difficulty_rating: None,
            energy_level_before: None,
            energy_level_after: None,
            calories_burned: None,
            created_at: Utc::now(),
        }
    }

    fn check_in(energy: Option<i32>, motivation: Option<i32>) -> CheckIn {
        CheckIn {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: date(2024, 3, 15),
            energy_level: energy,
            motivation_level: motivation,
            sleep_quality: None,
            stress_level: None,
            muscle_soreness: None,
            mood: None,
            notes: None,
            planned_workout: false,
            workout_completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_week_label_uses_monday() {
        // Sunday 2024-03-17 belongs to the week starting Monday 2024-03-11.
        assert_eq!(week_label(date(2024, 3, 17)), "2024-W11");
        assert_eq!(week_label(date(2024, 3, 11)), "2024-W11");
        assert_eq!(week_label(date(2024, 3, 18)), "2024-W12");
    }

    #[test]
    fn test_week_label_across_year_boundary() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025.
        assert_eq!(week_label(date(2025, 1, 1)), "2025-W01");
        assert_eq!(week_label(date(2024, 12, 30)), "2025-W01");
    }

    #[test]
    fn test_histogram_partitions_workouts() {
        let dates = vec![
            date(2024, 3, 4),
            date(2024, 3, 5),
            date(2024, 3, 5),
            date(2024, 3, 12),
            date(2024, 2, 28),
        ];
        let histogram = weekly_histogram(dates.clone());

        assert_eq!(histogram.values().sum::<u32>() as usize, dates.len());
        assert_eq!(histogram["2024-W10"], 3);
        assert_eq!(histogram["2024-W11"], 1);
        assert_eq!(histogram["2024-W09"], 1);
    }

    #[test]
    fn test_average_counts_all_check_ins_in_denominator() {
        let check_ins = vec![
            check_in(Some(8), Some(6)),
            check_in(None, Some(7)),
            check_in(Some(5), None),
        ];
        assert_eq!(average_level(&check_ins, |c| c.energy_level), 4.3);
        assert_eq!(average_level(&check_ins, |c| c.motivation_level), 4.3);
        assert_eq!(average_level(&[], |c| c.energy_level), 0.0);
    }

    #[test]
    fn test_consistency_is_linear_in_count() {
        assert_eq!(workout_consistency(0), 0.0);
        assert_eq!(workout_consistency(15), 50.0);
        assert_eq!(workout_consistency(30), 100.0);
        assert!(workout_consistency(36) > 100.0);
        for count in 0..40 {
            assert!(workout_consistency(count + 1) >= workout_consistency(count));
        }
    }

    #[test]
    fn test_build_overview_keeps_five_most_recent() {
        let workouts: Vec<Workout> = (0..8)
            .map(|i| workout(date(2024, 3, 15) - Duration::days(i)))
            .collect();
        let newest = workouts[0].id;
        let stats = UserStats { total_workouts: 8, current_streak: 8, personal_records: 0 };

        let overview = build_overview(stats, workouts, &[check_in(Some(9), Some(9))]);

        assert_eq!(overview.recent_workouts.len(), 5);
        assert_eq!(overview.recent_workouts[0].id, newest);
        assert_eq!(overview.weekly_workout_data.values().sum::<u32>(), 8);
        assert_eq!(overview.avg_energy_level, 9.0);
        assert!((overview.workout_consistency - 8.0 / 30.0 * 100.0).abs() < f64::EPSILON);
    }
}
