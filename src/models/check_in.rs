use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::analytics::UserStats;

/// Daily subjective status snapshot. Scales run 1-10.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckIn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub energy_level: Option<i32>,
    pub motivation_level: Option<i32>,
    pub sleep_quality: Option<i32>,
    pub stress_level: Option<i32>,
    pub muscle_soreness: Option<i32>,
    /// great, good, okay, tired, stressed
    pub mood: Option<String>,
    pub notes: Option<String>,
    pub planned_workout: bool,
    pub workout_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CheckInRequest {
    /// How the user feels today, in their own words.
    pub status: String,
    #[validate(range(min = 1, max = 10, message = "Energy level must be between 1 and 10"))]
    pub energy_level: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Motivation level must be between 1 and 10"))]
    pub motivation_level: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Sleep quality must be between 1 and 10"))]
    pub sleep_quality: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Stress level must be between 1 and 10"))]
    pub stress_level: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Muscle soreness must be between 1 and 10"))]
    pub muscle_soreness: Option<i32>,
    #[validate(length(max = 20, message = "Mood must be at most 20 characters"))]
    pub mood: Option<String>,
}

/// Check-in row waiting to be committed together with its generated workout.
#[derive(Debug, Clone, Default)]
pub struct NewCheckIn {
    pub date: NaiveDate,
    pub energy_level: Option<i32>,
    pub motivation_level: Option<i32>,
    pub sleep_quality: Option<i32>,
    pub stress_level: Option<i32>,
    pub muscle_soreness: Option<i32>,
    pub mood: Option<String>,
    pub notes: Option<String>,
    pub planned_workout: bool,
}

impl NewCheckIn {
    pub fn from_request(request: &CheckInRequest, date: NaiveDate, status: String) -> Self {
        Self {
            date,
            energy_level: request.energy_level,
            motivation_level: request.motivation_level,
            sleep_quality: request.sleep_quality,
            stress_level: request.stress_level,
            muscle_soreness: request.muscle_soreness,
            mood: request
                .mood
                .as_ref()
                .map(|mood| mood.trim().to_lowercase())
                .filter(|mood| !mood.is_empty()),
            notes: Some(status),
            planned_workout: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub reply: String,
    pub stats: UserStats,
}
