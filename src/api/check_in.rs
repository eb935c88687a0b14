use axum::{extract::State, response::Json, routing::post, Router};

use crate::analytics::today;
use crate::auth::AuthUser;
use crate::error::CoachResult;
use crate::models::{CheckInRequest, CheckInResponse};
use crate::services::CheckInService;
use crate::state::AppState;

pub fn check_in_routes() -> Router<AppState> {
    Router::new().route("/check-in", post(check_in))
}

/// Generate today's workout from the user's check-in
#[tracing::instrument(skip(service, request))]
async fn check_in(
    State(service): State<CheckInService>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CheckInRequest>,
) -> CoachResult<Json<CheckInResponse>> {
    let response = service.check_in(user_id, request, today()).await?;
    Ok(Json(response))
}
