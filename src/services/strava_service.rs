use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::analytics::{
    estimate_recovery, ReadinessPolicy, RecoveryMetrics, RECOVERY_ACTIVITY_LIMIT,
};
use crate::auth::{JwtService, TokenKind};
use crate::error::{CoachError, CoachResult};
use crate::models::{StravaCallbackQuery, StravaConnection};
use crate::repository::StravaStore;
use crate::services::strava_api_client::StravaApiClient;

/// Strava account linking and the recovery estimate built on its activities.
#[derive(Clone)]
pub struct StravaService {
    store: Arc<dyn StravaStore>,
    api: StravaApiClient,
    jwt: JwtService,
    policy: ReadinessPolicy,
}

impl StravaService {
    pub fn new(
        store: Arc<dyn StravaStore>,
        api: StravaApiClient,
        jwt: JwtService,
        policy: ReadinessPolicy,
    ) -> Self {
        Self {
            store,
            api,
            jwt,
            policy,
        }
    }

    /// Authorization URL whose `state` identifies the user on the way back.
    pub fn connect_url(&self, user_id: Uuid) -> CoachResult<String> {
        let state = self.jwt.create_state_token(user_id)?;
        Ok(self.api.authorization_url(&state))
    }

    /// Completes the OAuth redirect and stores the tokens. Returns the user the
    /// `state` token was issued to.
    #[instrument(skip(self, query))]
    pub async fn handle_callback(&self, query: StravaCallbackQuery) -> CoachResult<Uuid> {
        if let Some(error) = query.error {
            warn!(%error, "Strava authorization was denied");
            return Err(CoachError::Validation("Strava authorization was denied".to_string()));
        }

        let state = query.state.ok_or(CoachError::Unauthorized)?;
        let user_id = self.jwt.verify(&state, TokenKind::OauthState)?;
        let code = query
            .code
            .ok_or_else(|| CoachError::Validation("Missing authorization code".to_string()))?;

        let tokens = self.api.exchange_code(&code).await.map_err(|e| {
            warn!(%user_id, error = ?e, "Strava code exchange failed");
            CoachError::Upstream("Unable to connect to Strava. Please try again.".to_string())
        })?;
        let athlete_id = tokens
            .athlete
            .as_ref()
            .map(|athlete| athlete.id)
            .ok_or_else(|| {
                CoachError::Upstream("Strava did not return an athlete".to_string())
            })?;

        self.store.save_connection(user_id, athlete_id, &tokens).await?;
        info!(%user_id, athlete_id, "Connected Strava");
        Ok(user_id)
    }

    pub async fn disconnect(&self, user_id: Uuid) -> CoachResult<bool> {
        let removed = self.store.delete_connection(user_id).await?;
        if removed {
            info!(%user_id, "Disconnected Strava");
        }
        Ok(removed)
    }

    pub async fn connection(&self, user_id: Uuid) -> CoachResult<Option<StravaConnection>> {
        Ok(self.store.connection(user_id).await?)
    }

    /// `NotConnected` without a stored connection. Any failure talking to
    /// Strava is logged and yields `None`; a failed stats lookup only leaves
    /// `athlete_stats` empty.
    #[instrument(skip(self))]
    pub async fn recovery_metrics(&self, user_id: Uuid) -> CoachResult<Option<RecoveryMetrics>> {
        let connection = self
            .connection(user_id)
            .await?
            .ok_or(CoachError::NotConnected)?;

        let access_token = match self.fresh_access_token(connection.clone()).await {
            Ok(token) => token,
            Err(e) => {
                warn!(%user_id, error = ?e, "Could not obtain a Strava access token");
                return Ok(None);
            }
        };

        let activities = match self
            .api
            .recent_activities(&access_token, RECOVERY_ACTIVITY_LIMIT)
            .await
        {
            Ok(activities) => activities,
            Err(e) => {
                warn!(%user_id, error = ?e, "Failed to fetch Strava activities");
                return Ok(None);
            }
        };

        let Some(mut metrics) = estimate_recovery(&activities, &self.policy) else {
            return Ok(None);
        };

        match self.api.athlete_stats(&access_token, connection.athlete_id).await {
            Ok(stats) => metrics.athlete_stats = Some(stats),
            Err(e) => warn!(%user_id, error = ?e, "Failed to fetch Strava athlete stats"),
        }

        Ok(Some(metrics))
    }

    /// Refreshes and persists the tokens when they are about to expire.
    async fn fresh_access_token(&self, connection: StravaConnection) -> anyhow::Result<String> {
        if !connection.needs_refresh(Utc::now()) {
            return Ok(connection.access_token);
        }

        let tokens = self.api.refresh_token(&connection.refresh_token).await?;
        self.store
            .save_connection(connection.user_id, connection.athlete_id, &tokens)
            .await
            .context("Failed to store refreshed Strava tokens")?;
        info!(user_id = %connection.user_id, "Refreshed Strava token");

        Ok(tokens.access_token)
    }
}
