// Storage seams for the analytics and check-in paths

pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    BodyMeasurement, CheckIn, ExerciseEntry, Goals, NewCheckIn, NewWorkout, PersonalRecord, Profile,
    StravaConnection, StravaTokenResponse, Workout,
};

pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Read-only queries behind the progress analytics. Every call is scoped to
/// one user.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn count_workouts(&self, user_id: Uuid) -> Result<i64>;

    async fn count_personal_records(&self, user_id: Uuid) -> Result<i64>;

    /// Completion dates of the `limit` most recent workouts, newest first.
    async fn recent_workout_dates(&self, user_id: Uuid, limit: i64) -> Result<Vec<NaiveDate>>;

    /// Workouts completed on or after `since`, newest first.
    async fn workouts_since(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<Workout>>;

    async fn check_ins_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
        order: SortOrder,
        limit: Option<i64>,
    ) -> Result<Vec<CheckIn>>;

    /// Newest first.
    async fn personal_records(&self, user_id: Uuid) -> Result<Vec<PersonalRecord>>;

    /// Exercises with a per-set weight array, oldest workout first.
    async fn weighted_exercises(&self, user_id: Uuid) -> Result<Vec<ExerciseEntry>>;

    /// Oldest first.
    async fn body_measurements(&self, user_id: Uuid) -> Result<Vec<BodyMeasurement>>;
}

/// Reads and the single atomic write of the check-in flow.
#[async_trait]
pub trait CheckInStore: Send + Sync {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    async fn goals(&self, user_id: Uuid) -> Result<Option<Goals>>;

    /// Newest first.
    async fn recent_check_ins(&self, user_id: Uuid, limit: i64) -> Result<Vec<CheckIn>>;

    /// Persists both rows or neither.
    async fn record_check_in(
        &self,
        user_id: Uuid,
        check_in: NewCheckIn,
        workout: NewWorkout,
    ) -> Result<(CheckIn, Workout)>;
}

/// Stored Strava credentials, at most one connection per user.
#[async_trait]
pub trait StravaStore: Send + Sync {
    async fn connection(&self, user_id: Uuid) -> Result<Option<StravaConnection>>;

    /// Inserts or replaces the user's connection.
    async fn save_connection(
        &self,
        user_id: Uuid,
        athlete_id: i64,
        tokens: &StravaTokenResponse,
    ) -> Result<()>;

    /// Whether a connection was removed.
    async fn delete_connection(&self, user_id: Uuid) -> Result<bool>;
}
