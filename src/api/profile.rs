use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::analytics::today;
use crate::auth::AuthUser;
use crate::error::CoachResult;
use crate::models::{Goals, GoalsRequest, Profile, ProfileRequest};
use crate::services::{ProfileService, UserData};
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/user-data", get(get_user_data))
        .route("/profile", post(save_profile))
        .route("/goals", post(save_goals))
}

/// Profile, goals and headline stats in one payload
#[tracing::instrument(skip(service))]
async fn get_user_data(
    State(service): State<ProfileService>,
    AuthUser(user_id): AuthUser,
) -> CoachResult<Json<UserData>> {
    Ok(Json(service.user_data(user_id, today()).await?))
}

#[tracing::instrument(skip(service, request))]
async fn save_profile(
    State(service): State<ProfileService>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ProfileRequest>,
) -> CoachResult<Json<Profile>> {
    Ok(Json(service.save_profile(user_id, request).await?))
}

#[tracing::instrument(skip(service, request))]
async fn save_goals(
    State(service): State<ProfileService>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GoalsRequest>,
) -> CoachResult<Json<Goals>> {
    Ok(Json(service.save_goals(user_id, request).await?))
}
