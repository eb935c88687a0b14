use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Metric a personal record is measured in. Exactly one per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    MaxWeight,
    MaxReps,
    FastestTime,
    LongestDistance,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::MaxWeight => "max_weight",
            RecordType::MaxReps => "max_reps",
            RecordType::FastestTime => "fastest_time",
            RecordType::LongestDistance => "longest_distance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "max_weight" => Some(RecordType::MaxWeight),
            "max_reps" => Some(RecordType::MaxReps),
            "fastest_time" => Some(RecordType::FastestTime),
            "longest_distance" => Some(RecordType::LongestDistance),
            _ => None,
        }
    }

    /// Unit assumed when the caller does not give one.
    pub fn default_unit(&self) -> &'static str {
        match self {
            RecordType::MaxWeight => "kg",
            RecordType::MaxReps => "reps",
            RecordType::FastestTime => "seconds",
            RecordType::LongestDistance => "km",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    /// Stored as the `RecordType` string form.
    pub record_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub date_achieved: NaiveDate,
    pub workout_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPersonalRecord {
    #[validate(length(min = 1, max = 100, message = "Exercise name is required"))]
    pub exercise_name: String,
    pub record_type: RecordType,
    #[validate(range(min = 0.0, message = "Record value cannot be negative"))]
    pub value: f64,
    #[validate(length(max = 10))]
    pub unit: Option<String>,
    pub date_achieved: Option<NaiveDate>,
    pub workout_id: Option<Uuid>,
    pub notes: Option<String>,
}
