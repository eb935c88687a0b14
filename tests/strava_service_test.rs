use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thrshld::analytics::ReadinessPolicy;
use thrshld::auth::JwtService;
use thrshld::config::StravaConfig;
use thrshld::models::{StravaConnection, StravaTokenResponse};
use thrshld::repository::StravaStore;
use thrshld::services::{StravaApiClient, StravaService};
use thrshld::CoachError;

const ATHLETE_ID: i64 = 42;

#[derive(Default)]
struct MemoryStravaStore {
    connections: Mutex<HashMap<Uuid, StravaConnection>>,
}

impl MemoryStravaStore {
    fn connect(&self, user_id: Uuid, access_token: &str, expires_in: ChronoDuration) {
        let now = Utc::now();
        self.connections.lock().unwrap().insert(
            user_id,
            StravaConnection {
                user_id,
                athlete_id: ATHLETE_ID,
                access_token: access_token.to_string(),
                refresh_token: "stored-refresh".to_string(),
                expires_at: now + expires_in,
                created_at: now,
                updated_at: now,
            },
        );
    }

    fn stored(&self, user_id: Uuid) -> Option<StravaConnection> {
        self.connections.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl StravaStore for MemoryStravaStore {
    async fn connection(&self, user_id: Uuid) -> anyhow::Result<Option<StravaConnection>> {
        Ok(self.stored(user_id))
    }

    async fn save_connection(
        &self,
        user_id: Uuid,
        athlete_id: i64,
        tokens: &StravaTokenResponse,
    ) -> anyhow::Result<()> {
        let now = Utc::now();
        self.connections.lock().unwrap().insert(
            user_id,
            StravaConnection {
                user_id,
                athlete_id,
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                expires_at: tokens.expires_at_utc(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn delete_connection(&self, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self.connections.lock().unwrap().remove(&user_id).is_some())
    }
}

fn service(server: &MockServer, store: Arc<MemoryStravaStore>) -> StravaService {
    let config = StravaConfig {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost:3000/api/strava/callback".to_string(),
        api_base_url: format!("{}/api/v3", server.uri()),
        oauth_base_url: format!("{}/oauth", server.uri()),
        timeout: Duration::from_secs(5),
    };

    StravaService::new(
        store,
        StravaApiClient::new(config).unwrap(),
        JwtService::new("strava-test-secret"),
        ReadinessPolicy::default(),
    )
}

fn activities_body() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "name": "Tempo Run",
            "type": "Run",
            "start_date": "2024-03-14T07:00:00Z",
            "distance": 10000.0,
            "moving_time": 3000,
            "suffer_score": 120.0
        },
        {
            "id": 2,
            "name": "Easy Ride",
            "type": "Ride",
            "start_date": "2024-03-13T07:00:00Z",
            "distance": 20000.0,
            "moving_time": 3600,
            "suffer_score": 40.0
        }
    ])
}

async fn mount_activities(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recovery_without_connection_is_not_connected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let strava = service(&server, Arc::new(MemoryStravaStore::default()));

    let result = strava.recovery_metrics(Uuid::new_v4()).await;

    assert_matches!(result, Err(CoachError::NotConnected));
}

#[tokio::test]
async fn test_failed_token_refresh_yields_no_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid refresh token"))
        .expect(1)
        .mount(&server)
        .await;
    mount_activities(&server, ResponseTemplate::new(200).set_body_json(activities_body())).await;

    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "expired-access", ChronoDuration::minutes(-10));
    let strava = service(&server, store.clone());

    let metrics = strava.recovery_metrics(user_id).await.unwrap();

    assert!(metrics.is_none());
    assert_eq!(store.stored(user_id).unwrap().access_token, "expired-access");
}

#[tokio::test]
async fn test_token_close_to_expiry_is_refreshed_and_stored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_at": (Utc::now() + ChronoDuration::hours(6)).timestamp()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(header("authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activities_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "old-access", ChronoDuration::minutes(2));
    let strava = service(&server, store.clone());

    let metrics = strava.recovery_metrics(user_id).await.unwrap();

    assert!(metrics.is_some());
    let stored = store.stored(user_id).unwrap();
    assert_eq!(stored.access_token, "new-access");
    assert_eq!(stored.refresh_token, "new-refresh");
    assert_eq!(stored.athlete_id, ATHLETE_ID);
}

#[tokio::test]
async fn test_failed_activity_fetch_yields_no_metrics() {
    let server = MockServer::start().await;
    mount_activities(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;

    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "access", ChronoDuration::hours(3));

    let metrics = service(&server, store).recovery_metrics(user_id).await.unwrap();

    assert!(metrics.is_none());
}

#[tokio::test]
async fn test_no_recent_activities_yields_no_metrics() {
    let server = MockServer::start().await;
    mount_activities(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/athletes/{}/stats", ATHLETE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "access", ChronoDuration::hours(3));

    let metrics = service(&server, store).recovery_metrics(user_id).await.unwrap();

    assert!(metrics.is_none());
}

#[tokio::test]
async fn test_failed_stats_lookup_keeps_metrics() {
    let server = MockServer::start().await;
    mount_activities(&server, ResponseTemplate::new(200).set_body_json(activities_body())).await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/athletes/{}/stats", ATHLETE_ID)))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "access", ChronoDuration::hours(3));

    let metrics = service(&server, store)
        .recovery_metrics(user_id)
        .await
        .unwrap()
        .unwrap();

    assert!(metrics.athlete_stats.is_none());
    assert_eq!(metrics.volume.activities_count, 2);
    assert_eq!(metrics.training_load.weekly_total, 160.0);
}

#[tokio::test]
async fn test_stats_are_attached_when_available() {
    let server = MockServer::start().await;
    mount_activities(&server, ResponseTemplate::new(200).set_body_json(activities_body())).await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/athletes/{}/stats", ATHLETE_ID)))
        .and(header("authorization", "Bearer access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"all_run_totals": {"count": 12}})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "access", ChronoDuration::hours(3));

    let metrics = service(&server, store)
        .recovery_metrics(user_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(metrics.athlete_stats.unwrap()["all_run_totals"]["count"], 12);
}

#[tokio::test]
async fn test_disconnect_reports_whether_a_connection_existed() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStravaStore::default());
    let user_id = Uuid::new_v4();
    store.connect(user_id, "access", ChronoDuration::hours(3));
    let strava = service(&server, store.clone());

    assert!(strava.disconnect(user_id).await.unwrap());
    assert!(!strava.disconnect(user_id).await.unwrap());
    assert!(strava.connection(user_id).await.unwrap().is_none());
}
