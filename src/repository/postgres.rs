use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{CheckInStore, ProgressStore, SortOrder, StravaStore};
use crate::models::{
    BodyMeasurement, CheckIn, ExerciseEntry, Goals, NewCheckIn, NewWorkout, PersonalRecord, Profile,
    StravaConnection, StravaTokenResponse, Workout,
};

pub const WORKOUT_COLUMNS: &str = "id, user_id, workout_name, workout_type, date_completed, \
     duration_minutes, exercises, notes, difficulty_rating, energy_level_before, \
     energy_level_after, calories_burned, created_at";

pub const CHECK_IN_COLUMNS: &str = "id, user_id, date, energy_level, motivation_level, \
     sleep_quality, stress_level, muscle_soreness, mood, notes, planned_workout, \
     workout_completed, created_at";

pub const PROFILE_COLUMNS: &str = "id, user_id, name, age, gender, height_cm, weight_kg, \
     date_of_birth, experience_level, primary_activity, training_location, training_days_per_week, \
     squat_1rm, bench_1rm, deadlift_1rm, overhead_press_1rm, max_pull_ups, five_km_time, \
     preferred_intensity, created_at, updated_at";

pub const GOALS_COLUMNS: &str = "id, user_id, workout_goal, compound_lifts, include_running, \
     include_conditioning, target_sessions_per_week, specific_targets, created_at, updated_at";

pub const PERSONAL_RECORD_COLUMNS: &str = "id, user_id, exercise_name, record_type, value, unit, \
     date_achieved, workout_id, notes, created_at";

pub const STRAVA_CONNECTION_COLUMNS: &str =
    "user_id, athlete_id, access_token, refresh_token, expires_at, created_at, updated_at";

pub const BODY_MEASUREMENT_COLUMNS: &str = "id, user_id, date, weight_kg, body_fat_percentage, \
     muscle_mass_kg, measurements, progress_photos, notes, created_at";

/// Postgres-backed implementation of the storage seams.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

pub async fn fetch_profile(db: &PgPool, user_id: Uuid) -> Result<Option<Profile>> {
    let query = format!("SELECT {} FROM user_profiles WHERE user_id = $1", PROFILE_COLUMNS);
    sqlx::query_as::<_, Profile>(&query)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch profile")
}

pub async fn fetch_goals(db: &PgPool, user_id: Uuid) -> Result<Option<Goals>> {
    let query = format!("SELECT {} FROM user_goals WHERE user_id = $1", GOALS_COLUMNS);
    sqlx::query_as::<_, Goals>(&query)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch goals")
}

/// Inserts a workout and its exercise rows on `conn`. The caller owns the
/// transaction.
pub async fn insert_workout(
    conn: &mut PgConnection,
    user_id: Uuid,
    workout: &NewWorkout,
    default_date: NaiveDate,
) -> Result<Workout> {
    let exercises_json = if workout.exercises.is_empty() {
        None
    } else {
        Some(Json(serde_json::to_value(&workout.exercises).context("Failed to encode exercises")?))
    };

    let query = format!(
        r#"
        INSERT INTO workouts (
            id, user_id, workout_name, workout_type, date_completed, duration_minutes,
            exercises, notes, difficulty_rating, energy_level_before, energy_level_after,
            calories_burned, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {}
        "#,
        WORKOUT_COLUMNS
    );

    let saved = sqlx::query_as::<_, Workout>(&query)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&workout.workout_name)
        .bind(&workout.workout_type)
        .bind(workout.date_completed.unwrap_or(default_date))
        .bind(workout.duration_minutes)
        .bind(exercises_json)
        .bind(&workout.notes)
        .bind(workout.difficulty_rating)
        .bind(workout.energy_level_before)
        .bind(workout.energy_level_after)
        .bind(workout.calories_burned)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to insert workout")?;

    for exercise in &workout.exercises {
        sqlx::query(
            r#"
            INSERT INTO exercises (
                workout_id, exercise_name, exercise_type, muscle_groups, sets_completed,
                reps_per_set, weight_per_set, distance_km, time_seconds, rest_between_sets,
                personal_record, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(saved.id)
        .bind(&exercise.exercise_name)
        .bind(&exercise.exercise_type)
        .bind(Json(&exercise.muscle_groups))
        .bind(exercise.sets_completed())
        .bind(exercise.reps_per_set.as_ref().map(Json))
        .bind(exercise.weight_per_set.as_ref().map(Json))
        .bind(exercise.distance_km)
        .bind(exercise.time_seconds)
        .bind(exercise.rest_between_sets)
        .bind(exercise.personal_record)
        .bind(&exercise.notes)
        .execute(&mut *conn)
        .await
        .context("Failed to insert exercise")?;
    }

    Ok(saved)
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn count_workouts(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .context("Failed to count workouts")?;
        Ok(count)
    }

    async fn count_personal_records(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM personal_records WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await
                .context("Failed to count personal records")?;
        Ok(count)
    }

    async fn recent_workout_dates(&self, user_id: Uuid, limit: i64) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT date_completed FROM workouts WHERE user_id = $1 \
             ORDER BY date_completed DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("Failed to fetch recent workout dates")?;
        Ok(dates)
    }

    async fn workouts_since(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<Workout>> {
        let query = format!(
            "SELECT {} FROM workouts WHERE user_id = $1 AND date_completed >= $2 \
             ORDER BY date_completed DESC, created_at DESC",
            WORKOUT_COLUMNS
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.db)
            .await
            .context("Failed to fetch workouts")
    }

    async fn check_ins_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
        order: SortOrder,
        limit: Option<i64>,
    ) -> Result<Vec<CheckIn>> {
        let mut query = format!(
            "SELECT {} FROM check_ins WHERE user_id = $1 AND date >= $2 \
             ORDER BY date {}, created_at {}",
            CHECK_IN_COLUMNS,
            order.as_sql(),
            order.as_sql()
        );
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.db)
            .await
            .context("Failed to fetch check-ins")
    }

    async fn personal_records(&self, user_id: Uuid) -> Result<Vec<PersonalRecord>> {
        let query = format!(
            "SELECT {} FROM personal_records WHERE user_id = $1 \
             ORDER BY date_achieved DESC, created_at DESC",
            PERSONAL_RECORD_COLUMNS
        );
        sqlx::query_as::<_, PersonalRecord>(&query)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .context("Failed to fetch personal records")
    }

    async fn weighted_exercises(&self, user_id: Uuid) -> Result<Vec<ExerciseEntry>> {
        sqlx::query_as::<_, ExerciseEntry>(
            r#"
            SELECT e.exercise_name, w.date_completed, e.weight_per_set, e.reps_per_set
            FROM exercises e
            JOIN workouts w ON w.id = e.workout_id
            WHERE w.user_id = $1
              AND e.weight_per_set IS NOT NULL
              AND jsonb_typeof(e.weight_per_set) = 'array'
            ORDER BY w.date_completed ASC, w.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("Failed to fetch exercise history")
    }

    async fn body_measurements(&self, user_id: Uuid) -> Result<Vec<BodyMeasurement>> {
        let query = format!(
            "SELECT {} FROM body_measurements WHERE user_id = $1 ORDER BY date ASC, created_at ASC",
            BODY_MEASUREMENT_COLUMNS
        );
        sqlx::query_as::<_, BodyMeasurement>(&query)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .context("Failed to fetch body measurements")
    }
}

#[async_trait]
impl CheckInStore for PgStore {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        fetch_profile(&self.db, user_id).await
    }

    async fn goals(&self, user_id: Uuid) -> Result<Option<Goals>> {
        fetch_goals(&self.db, user_id).await
    }

    async fn recent_check_ins(&self, user_id: Uuid, limit: i64) -> Result<Vec<CheckIn>> {
        let query = format!(
            "SELECT {} FROM check_ins WHERE user_id = $1 \
             ORDER BY date DESC, created_at DESC LIMIT $2",
            CHECK_IN_COLUMNS
        );
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await
            .context("Failed to fetch recent check-ins")
    }

    async fn record_check_in(
        &self,
        user_id: Uuid,
        check_in: NewCheckIn,
        workout: NewWorkout,
    ) -> Result<(CheckIn, Workout)> {
        let mut tx = self.db.begin().await.context("Failed to begin transaction")?;

        let query = format!(
            r#"
            INSERT INTO check_ins (
                user_id, date, energy_level, motivation_level, sleep_quality, stress_level,
                muscle_soreness, mood, notes, planned_workout, workout_completed, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11)
            RETURNING {}
            "#,
            CHECK_IN_COLUMNS
        );

        let saved_check_in = sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(check_in.date)
            .bind(check_in.energy_level)
            .bind(check_in.motivation_level)
            .bind(check_in.sleep_quality)
            .bind(check_in.stress_level)
            .bind(check_in.muscle_soreness)
            .bind(&check_in.mood)
            .bind(&check_in.notes)
            .bind(check_in.planned_workout)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert check-in")?;

        let saved_workout = insert_workout(&mut *tx, user_id, &workout, check_in.date).await?;

        tx.commit().await.context("Failed to commit check-in")?;

        Ok((saved_check_in, saved_workout))
    }
}

#[async_trait]
impl StravaStore for PgStore {
    async fn connection(&self, user_id: Uuid) -> Result<Option<StravaConnection>> {
        let query = format!(
            "SELECT {} FROM strava_connections WHERE user_id = $1",
            STRAVA_CONNECTION_COLUMNS
        );
        sqlx::query_as::<_, StravaConnection>(&query)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("Failed to fetch Strava connection")
    }

    async fn save_connection(
        &self,
        user_id: Uuid,
        athlete_id: i64,
        tokens: &StravaTokenResponse,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO strava_connections (
                user_id, athlete_id, access_token, refresh_token, expires_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                athlete_id = EXCLUDED.athlete_id,
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(athlete_id)
        .bind(&tokens.access_token)
        .bind(&tokens.refresh_token)
        .bind(tokens.expires_at_utc())
        .execute(&self.db)
        .await
        .context("Failed to store Strava connection")?;

        Ok(())
    }

    async fn delete_connection(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM strava_connections WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("Failed to delete Strava connection")?;

        Ok(result.rows_affected() > 0)
    }
}
