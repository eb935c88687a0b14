use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_name: String,
    /// strength, cardio, conditioning, hybrid, generated
    pub workout_type: Option<String>,
    pub date_completed: NaiveDate,
    pub duration_minutes: Option<i32>,
    pub exercises: Option<Json<serde_json::Value>>,
    /// Free text; holds the full plan for generated workouts.
    pub notes: Option<String>,
    pub difficulty_rating: Option<i32>,
    pub energy_level_before: Option<i32>,
    pub energy_level_after: Option<i32>,
    pub calories_burned: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A single exercise performed inside a workout.
///
/// `reps_per_set` and `weight_per_set` are parallel arrays indexed by set. Their
/// lengths are not checked against each other.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_name: String,
    /// compound, isolation, cardio
    pub exercise_type: Option<String>,
    pub muscle_groups: Json<Vec<String>>,
    pub sets_completed: Option<i32>,
    pub reps_per_set: Option<Json<Vec<i32>>>,
    pub weight_per_set: Option<Json<Vec<f64>>>,
    pub distance_km: Option<f64>,
    pub time_seconds: Option<i32>,
    pub rest_between_sets: Option<i32>,
    pub personal_record: bool,
    pub notes: Option<String>,
}

/// Weighted exercise joined with the completion date of its workout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseEntry {
    pub exercise_name: String,
    pub date_completed: NaiveDate,
    pub weight_per_set: Json<Vec<f64>>,
    pub reps_per_set: Option<Json<Vec<i32>>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewWorkout {
    #[validate(length(min = 1, max = 100, message = "Workout name is required"))]
    pub workout_name: String,
    #[validate(length(max = 50, message = "Workout type must be at most 50 characters"))]
    pub workout_type: Option<String>,
    /// Defaults to today when omitted.
    pub date_completed: Option<NaiveDate>,
    #[validate(range(min = 0, max = 1440))]
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub difficulty_rating: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub energy_level_before: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub energy_level_after: Option<i32>,
    pub calories_burned: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<NewExercise>,
}

impl NewWorkout {
    /// The workout stored for a generated plan.
    pub fn generated(date: NaiveDate, plan: String) -> Self {
        Self {
            workout_name: "Daily Workout".to_string(),
            workout_type: Some("generated".to_string()),
            date_completed: Some(date),
            notes: Some(plan),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewExercise {
    #[validate(length(min = 1, max = 100, message = "Exercise name is required"))]
    pub exercise_name: String,
    #[validate(length(max = 50, message = "Exercise type must be at most 50 characters"))]
    pub exercise_type: Option<String>,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    pub reps_per_set: Option<Vec<i32>>,
    pub weight_per_set: Option<Vec<f64>>,
    pub distance_km: Option<f64>,
    pub time_seconds: Option<i32>,
    pub rest_between_sets: Option<i32>,
    #[serde(default)]
    pub personal_record: bool,
    pub notes: Option<String>,
}

impl NewExercise {
    /// Number of sets recorded, taken from the longer of the two per-set arrays.
    pub fn sets_completed(&self) -> Option<i32> {
        let reps = self.reps_per_set.as_ref().map(Vec::len);
        let weights = self.weight_per_set.as_ref().map(Vec::len);
        reps.max(weights).map(|sets| sets as i32)
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkoutListQuery {
    pub limit: Option<i64>,
}
