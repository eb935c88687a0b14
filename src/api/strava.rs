use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
    routing::{get, post},
    Router,
};
use tracing::warn;

use crate::analytics::RecoveryMetrics;
use crate::auth::{AuthUser, MessageResponse};
use crate::error::{CoachError, CoachResult};
use crate::models::{StravaCallbackQuery, StravaConnectResponse};
use crate::services::StravaService;
use crate::state::{AppState, PublicBaseUrl};

pub fn strava_routes() -> Router<AppState> {
    Router::new()
        .route("/connect", get(connect))
        .route("/callback", get(callback))
        .route("/disconnect", post(disconnect))
        .route("/recovery-metrics", get(recovery_metrics))
}

#[tracing::instrument(skip(service))]
async fn connect(
    State(service): State<StravaService>,
    AuthUser(user_id): AuthUser,
) -> CoachResult<Json<StravaConnectResponse>> {
    let authorization_url = service.connect_url(user_id)?;
    Ok(Json(StravaConnectResponse { authorization_url }))
}

/// Browser redirect target; the user is identified by the `state` token.
#[tracing::instrument(skip(service, base_url, query))]
async fn callback(
    State(service): State<StravaService>,
    State(base_url): State<PublicBaseUrl>,
    Query(query): Query<StravaCallbackQuery>,
) -> Redirect {
    let base = base_url.0.trim_end_matches('/');
    match service.handle_callback(query).await {
        Ok(_) => Redirect::to(&format!("{}/?strava=connected", base)),
        Err(e) => {
            warn!(error = %e, "Strava callback failed");
            Redirect::to(&format!("{}/?error=strava_auth_failed", base))
        }
    }
}

#[tracing::instrument(skip(service))]
async fn disconnect(
    State(service): State<StravaService>,
    AuthUser(user_id): AuthUser,
) -> CoachResult<Json<MessageResponse>> {
    service.disconnect(user_id).await?;
    Ok(Json(MessageResponse::new("Strava disconnected successfully.")))
}

#[tracing::instrument(skip(service))]
async fn recovery_metrics(
    State(service): State<StravaService>,
    AuthUser(user_id): AuthUser,
) -> CoachResult<Json<RecoveryMetrics>> {
    service
        .recovery_metrics(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| CoachError::Upstream("Unable to fetch recovery metrics".to_string()))
}
