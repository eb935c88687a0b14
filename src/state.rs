use axum::extract::FromRef;
use std::sync::Arc;

use crate::auth::{AuthService, JwtService};
use crate::cache::Cache;
use crate::config::AppConfig;
use crate::repository::PgStore;
use crate::services::{
    CheckInService, CompletionClient, Mailer, ProfileService, ProgressService, StravaApiClient,
    StravaService, WorkoutService,
};

/// Shared handler state. Each service is cheap to clone.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub jwt: JwtService,
    pub auth: AuthService,
    pub progress: ProgressService,
    pub check_in: CheckInService,
    pub profile: ProfileService,
    pub workouts: WorkoutService,
    pub strava: StravaService,
    pub public_base_url: PublicBaseUrl,
}

/// Where the browser is sent back to after the Strava redirect.
#[derive(Debug, Clone)]
pub struct PublicBaseUrl(pub String);

impl AppState {
    /// Wires the services over one store, cache and completion client.
    pub fn new(
        config: &AppConfig,
        store: PgStore,
        cache: Arc<dyn Cache>,
        completion: Arc<dyn CompletionClient>,
        mailer: Arc<dyn Mailer>,
    ) -> anyhow::Result<Self> {
        let jwt = JwtService::new(&config.jwt_secret);
        let db = store.pool().clone();
        let store = Arc::new(store);

        let progress = ProgressService::new(store.clone(), cache, config.cache.ttl);
        let check_in = CheckInService::new(store.clone(), completion, progress.clone());
        let strava_api = StravaApiClient::new(config.strava.clone())?;

        Ok(Self {
            auth: AuthService::new(
                db.clone(),
                jwt.clone(),
                mailer,
                config.public_base_url.clone(),
            ),
            profile: ProfileService::new(db.clone(), progress.clone()),
            workouts: WorkoutService::new(db, progress.clone()),
            strava: StravaService::new(store, strava_api, jwt.clone(), config.readiness),
            public_base_url: PublicBaseUrl(config.public_base_url.clone()),
            jwt,
            progress,
            check_in,
        })
    }
}
