use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CoachError, CoachResult};
use crate::models::{
    BodyMeasurement, NewBodyMeasurement, NewPersonalRecord, NewWorkout, PersonalRecord, Workout,
};
use crate::repository::postgres::{
    insert_workout, BODY_MEASUREMENT_COLUMNS, PERSONAL_RECORD_COLUMNS, WORKOUT_COLUMNS,
};
use crate::services::progress_service::ProgressService;

pub const DEFAULT_WORKOUT_LIST_LIMIT: i64 = 20;
pub const MAX_WORKOUT_LIST_LIMIT: i64 = 100;

/// Manual logging of workouts, body measurements and personal records.
#[derive(Clone)]
pub struct WorkoutService {
    db: PgPool,
    progress: ProgressService,
}

impl WorkoutService {
    pub fn new(db: PgPool, progress: ProgressService) -> Self {
        Self { db, progress }
    }

    /// Stores the workout and its exercise rows in one transaction.
    pub async fn log_workout(
        &self,
        user_id: Uuid,
        workout: NewWorkout,
        today: NaiveDate,
    ) -> CoachResult<Workout> {
        workout.validate()?;

        let mut tx = self.db.begin().await?;
        let saved = insert_workout(&mut *tx, user_id, &workout, today).await?;
        tx.commit().await?;

        info!(
            %user_id,
            workout_id = %saved.id,
            exercises = workout.exercises.len(),
            "Logged workout"
        );
        self.progress.invalidate_user(user_id).await;
        Ok(saved)
    }

    /// Most recent first.
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> CoachResult<Vec<Workout>> {
        let limit = limit
            .unwrap_or(DEFAULT_WORKOUT_LIST_LIMIT)
            .clamp(1, MAX_WORKOUT_LIST_LIMIT);

        let query = format!(
            "SELECT {} FROM workouts WHERE user_id = $1 \
             ORDER BY date_completed DESC, created_at DESC LIMIT $2",
            WORKOUT_COLUMNS
        );
        let workouts = sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(workouts)
    }

    pub async fn log_measurement(
        &self,
        user_id: Uuid,
        measurement: NewBodyMeasurement,
        today: NaiveDate,
    ) -> CoachResult<BodyMeasurement> {
        measurement.validate()?;
        if let Some((name, _)) = measurement.measurements.iter().find(|(_, value)| **value < 0.0) {
            return Err(CoachError::Validation(format!(
                "Measurement '{}' cannot be negative",
                name
            )));
        }

        let query = format!(
            r#"
            INSERT INTO body_measurements (
                user_id, date, weight_kg, body_fat_percentage, muscle_mass_kg, measurements,
                progress_photos, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BODY_MEASUREMENT_COLUMNS
        );

        let saved = sqlx::query_as::<_, BodyMeasurement>(&query)
            .bind(user_id)
            .bind(measurement.date.unwrap_or(today))
            .bind(measurement.weight_kg)
            .bind(measurement.body_fat_percentage)
            .bind(measurement.muscle_mass_kg)
            .bind(Json(&measurement.measurements))
            .bind(Json(&measurement.progress_photos))
            .bind(&measurement.notes)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        info!(%user_id, measurement_id = %saved.id, "Logged body measurement");
        self.progress.invalidate_user(user_id).await;
        Ok(saved)
    }

    pub async fn log_personal_record(
        &self,
        user_id: Uuid,
        record: NewPersonalRecord,
        today: NaiveDate,
    ) -> CoachResult<PersonalRecord> {
        record.validate()?;

        if let Some(workout_id) = record.workout_id {
            let owned: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2)",
            )
            .bind(workout_id)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
            if !owned {
                return Err(CoachError::NotFound("Workout"));
            }
        }

        let unit = record
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .unwrap_or_else(|| record.record_type.default_unit())
            .to_string();

        let query = format!(
            r#"
            INSERT INTO personal_records (
                user_id, exercise_name, record_type, value, unit, date_achieved, workout_id,
                notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PERSONAL_RECORD_COLUMNS
        );

        let saved = sqlx::query_as::<_, PersonalRecord>(&query)
            .bind(user_id)
            .bind(record.exercise_name.trim())
            .bind(record.record_type.as_str())
            .bind(record.value)
            .bind(&unit)
            .bind(record.date_achieved.unwrap_or(today))
            .bind(record.workout_id)
            .bind(&record.notes)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        info!(
            %user_id,
            record_id = %saved.id,
            exercise = %saved.exercise_name,
            "Logged personal record"
        );
        self.progress.invalidate_user(user_id).await;
        Ok(saved)
    }
}
