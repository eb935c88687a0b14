use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::analytics::today;
use crate::auth::AuthUser;
use crate::error::CoachResult;
use crate::models::{
    BodyMeasurement, NewBodyMeasurement, NewPersonalRecord, NewWorkout, PersonalRecord, Workout,
    WorkoutListQuery,
};
use crate::services::WorkoutService;
use crate::state::AppState;

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(log_workout))
        .route("/measurements", post(log_measurement))
        .route("/personal-records", post(log_personal_record))
}

#[tracing::instrument(skip(service, workout))]
async fn log_workout(
    State(service): State<WorkoutService>,
    AuthUser(user_id): AuthUser,
    Json(workout): Json<NewWorkout>,
) -> CoachResult<(StatusCode, Json<Workout>)> {
    let saved = service.log_workout(user_id, workout, today()).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[tracing::instrument(skip(service))]
async fn list_workouts(
    State(service): State<WorkoutService>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<WorkoutListQuery>,
) -> CoachResult<Json<Vec<Workout>>> {
    Ok(Json(service.list_workouts(user_id, query.limit).await?))
}

#[tracing::instrument(skip(service, measurement))]
async fn log_measurement(
    State(service): State<WorkoutService>,
    AuthUser(user_id): AuthUser,
    Json(measurement): Json<NewBodyMeasurement>,
) -> CoachResult<(StatusCode, Json<BodyMeasurement>)> {
    let saved = service.log_measurement(user_id, measurement, today()).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[tracing::instrument(skip(service, record))]
async fn log_personal_record(
    State(service): State<WorkoutService>,
    AuthUser(user_id): AuthUser,
    Json(record): Json<NewPersonalRecord>,
) -> CoachResult<(StatusCode, Json<PersonalRecord>)> {
    let saved = service.log_personal_record(user_id, record, today()).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
