use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tokens are refreshed this long before they actually expire.
pub const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Persisted Strava credentials, one row per user.
#[derive(Debug, Clone, FromRow)]
pub struct StravaConnection {
    pub user_id: Uuid,
    pub athlete_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StravaConnection {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at - Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES)
    }
}

/// Body of `/oauth/token` for both the code exchange and refresh grants.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch seconds.
    pub expires_at: i64,
    /// Only present on the authorization-code grant.
    #[serde(default)]
    pub athlete: Option<StravaAthlete>,
}

impl StravaTokenResponse {
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_at, 0).unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaAthlete {
    pub id: i64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// Summary activity as returned by `/athlete/activities`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaActivity {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub activity_type: String,
    pub start_date: DateTime<Utc>,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub moving_time: i64,
    #[serde(default)]
    pub suffer_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct StravaCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StravaConnectResponse {
    pub authorization_url: String,
}
