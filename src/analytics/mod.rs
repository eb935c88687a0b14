//! Read-path aggregations over a user's stored history.
//!
//! Everything here is a pure function of already-fetched records and an explicit
//! `today`, so the windows can be pinned in tests. Fetching, caching and failure
//! handling live in `services::progress_service`.

pub mod body_metrics;
pub mod overview;
pub mod recovery;
pub mod strength;
pub mod streak;
pub mod wellness;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use body_metrics::{build_body_metrics, BodyMetrics};
pub use overview::{
    average_level, build_overview, week_label, weekly_histogram, workout_consistency,
    ProgressOverview, OVERVIEW_CHECK_IN_LIMIT, OVERVIEW_RECENT_WORKOUTS, OVERVIEW_WINDOW_DAYS,
};
pub use recovery::{
    estimate_recovery, LoadStatus, Readiness, ReadinessLevel, ReadinessPolicy, RecoveryMetrics,
    TrainingLoad, TrainingVolume, RECOVERY_ACTIVITY_LIMIT,
};
pub use strength::{
    build_strength_progress, max_weight, total_volume, ProgressionPoint, RecordPoint,
    StrengthProgress,
};
pub use streak::{current_streak, UserStats, STREAK_LOOKBACK};
pub use wellness::{build_wellness_trends, WellnessTrends, WELLNESS_WINDOW_DAYS};

/// One point of a dated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint<T> {
    pub date: NaiveDate,
    pub value: T,
}

impl<T> DataPoint<T> {
    pub fn new(date: NaiveDate, value: T) -> Self {
        Self { date, value }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The calendar date analytics windows are anchored to.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
