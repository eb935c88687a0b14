use axum::{extract::State, response::Json, routing::get, Router};

use crate::analytics::{today, BodyMetrics, ProgressOverview, StrengthProgress, WellnessTrends};
use crate::auth::AuthUser;
use crate::services::ProgressService;
use crate::state::AppState;

/// Progress analytics. These never fail once the caller is authenticated;
/// storage problems produce empty payloads.
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/strength", get(strength))
        .route("/body-metrics", get(body_metrics))
        .route("/wellness", get(wellness))
}

#[tracing::instrument(skip(service))]
async fn overview(
    State(service): State<ProgressService>,
    AuthUser(user_id): AuthUser,
) -> Json<ProgressOverview> {
    Json(service.overview(user_id, today()).await)
}

#[tracing::instrument(skip(service))]
async fn strength(
    State(service): State<ProgressService>,
    AuthUser(user_id): AuthUser,
) -> Json<StrengthProgress> {
    Json(service.strength(user_id, today()).await)
}

#[tracing::instrument(skip(service))]
async fn body_metrics(
    State(service): State<ProgressService>,
    AuthUser(user_id): AuthUser,
) -> Json<BodyMetrics> {
    Json(service.body_metrics(user_id, today()).await)
}

#[tracing::instrument(skip(service))]
async fn wellness(
    State(service): State<ProgressService>,
    AuthUser(user_id): AuthUser,
) -> Json<WellnessTrends> {
    Json(service.wellness(user_id, today()).await)
}
