use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::check_in::check_in_routes;
use super::health::health_check;
use super::profile::profile_routes;
use super::progress::progress_routes;
use super::strava::strava_routes;
use super::workouts::workout_routes;
use crate::auth::cors_layer;
use crate::state::AppState;

pub fn create_routes(state: AppState, permissive_cors: bool) -> Router {
    let api = Router::new()
        .merge(profile_routes())
        .merge(check_in_routes())
        .merge(workout_routes())
        .nest("/auth", auth_routes())
        .nest("/progress", progress_routes())
        .nest("/strava", strava_routes());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(permissive_cors))
        .with_state(state)
}
