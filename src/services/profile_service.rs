use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::analytics::UserStats;
use crate::error::CoachResult;
use crate::models::{Goals, GoalsRequest, Profile, ProfileRequest};
use crate::repository::postgres::{fetch_goals, fetch_profile, GOALS_COLUMNS, PROFILE_COLUMNS};
use crate::services::progress_service::ProgressService;

/// `profile` and `goals` are empty objects until the user saves them.
#[derive(Debug, Serialize)]
pub struct UserData {
    pub profile: Value,
    pub goals: Value,
    pub stats: UserStats,
}

#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
    progress: ProgressService,
}

impl ProfileService {
    pub fn new(db: PgPool, progress: ProgressService) -> Self {
        Self { db, progress }
    }

    /// Creates the profile on first save and updates it in place afterwards.
    pub async fn save_profile(
        &self,
        user_id: Uuid,
        request: ProfileRequest,
    ) -> CoachResult<Profile> {
        let request = request.normalized();
        request.validate()?;
        let date_of_birth = request.parsed_date_of_birth();

        let query = format!(
            r#"
            INSERT INTO user_profiles (
                user_id, name, age, gender, height_cm, weight_kg, date_of_birth, experience_level,
                primary_activity, training_location, training_days_per_week, squat_1rm, bench_1rm,
                deadlift_1rm, overhead_press_1rm, max_pull_ups, five_km_time, preferred_intensity,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $19
            )
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                date_of_birth = EXCLUDED.date_of_birth,
                experience_level = EXCLUDED.experience_level,
                primary_activity = EXCLUDED.primary_activity,
                training_location = EXCLUDED.training_location,
                training_days_per_week = EXCLUDED.training_days_per_week,
                squat_1rm = EXCLUDED.squat_1rm,
                bench_1rm = EXCLUDED.bench_1rm,
                deadlift_1rm = EXCLUDED.deadlift_1rm,
                overhead_press_1rm = EXCLUDED.overhead_press_1rm,
                max_pull_ups = EXCLUDED.max_pull_ups,
                five_km_time = EXCLUDED.five_km_time,
                preferred_intensity = EXCLUDED.preferred_intensity,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&request.name)
            .bind(request.age)
            .bind(&request.gender)
            .bind(request.height_cm)
            .bind(request.weight_kg)
            .bind(date_of_birth)
            .bind(&request.experience_level)
            .bind(&request.primary_activity)
            .bind(&request.training_location)
            .bind(request.training_days_per_week)
            .bind(request.squat_1rm)
            .bind(request.bench_1rm)
            .bind(request.deadlift_1rm)
            .bind(request.overhead_press_1rm)
            .bind(request.max_pull_ups)
            .bind(&request.five_km_time)
            .bind(&request.preferred_intensity)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        info!(%user_id, "Saved profile");
        self.progress.invalidate_user(user_id).await;
        Ok(profile)
    }

    pub async fn save_goals(&self, user_id: Uuid, request: GoalsRequest) -> CoachResult<Goals> {
        let request = request.normalized();
        request.validate()?;

        let query = format!(
            r#"
            INSERT INTO user_goals (
                user_id, workout_goal, compound_lifts, include_running, include_conditioning,
                target_sessions_per_week, specific_targets, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                workout_goal = EXCLUDED.workout_goal,
                compound_lifts = EXCLUDED.compound_lifts,
                include_running = EXCLUDED.include_running,
                include_conditioning = EXCLUDED.include_conditioning,
                target_sessions_per_week = EXCLUDED.target_sessions_per_week,
                specific_targets = EXCLUDED.specific_targets,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            GOALS_COLUMNS
        );

        let goals = sqlx::query_as::<_, Goals>(&query)
            .bind(user_id)
            .bind(&request.workout_goal)
            .bind(Json(&request.compound_lifts))
            .bind(request.include_running)
            .bind(request.include_conditioning)
            .bind(request.target_sessions_per_week)
            .bind(Json(&request.specific_targets))
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        info!(%user_id, goal = %goals.workout_goal, "Saved goals");
        self.progress.invalidate_user(user_id).await;
        Ok(goals)
    }

    pub async fn user_data(&self, user_id: Uuid, today: NaiveDate) -> CoachResult<UserData> {
        let profile = fetch_profile(&self.db, user_id).await?;
        let goals = fetch_goals(&self.db, user_id).await?;
        let stats = self.progress.user_stats(user_id, today).await;

        Ok(UserData {
            profile: object_or_empty(profile)?,
            goals: object_or_empty(goals)?,
            stats,
        })
    }
}

fn object_or_empty<T: Serialize>(value: Option<T>) -> anyhow::Result<Value> {
    match value {
        Some(value) => Ok(serde_json::to_value(value)?),
        None => Ok(json!({})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_records_serialize_as_empty_objects() {
        let value = object_or_empty::<Goals>(None).unwrap();
        assert_eq!(value, json!({}));
    }
}
