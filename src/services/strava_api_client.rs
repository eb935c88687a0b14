use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::StravaConfig;
use crate::models::{StravaActivity, StravaTokenResponse};

pub const STRAVA_SCOPES: &str = "read,activity:read_all";

/// Thin HTTP client for the Strava OAuth and v3 REST endpoints.
#[derive(Clone)]
pub struct StravaApiClient {
    client: Client,
    config: StravaConfig,
}

impl StravaApiClient {
    pub fn new(config: StravaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build Strava HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}\
             &approval_prompt=auto&state={}",
            self.config.oauth_base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            STRAVA_SCOPES,
            urlencoding::encode(state)
        )
    }

    pub async fn exchange_code(&self, code: &str) -> Result<StravaTokenResponse> {
        self.token_request(&[("code", code), ("grant_type", "authorization_code")])
            .await
            .context("Strava code exchange failed")
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<StravaTokenResponse> {
        self.token_request(&[("refresh_token", refresh_token), ("grant_type", "refresh_token")])
            .await
            .context("Strava token refresh failed")
    }

    /// Newest first.
    pub async fn recent_activities(
        &self,
        access_token: &str,
        per_page: usize,
    ) -> Result<Vec<StravaActivity>> {
        self.get_json(access_token, &format!("athlete/activities?per_page={}", per_page))
            .await
    }

    /// Raw totals document; its shape is passed through to clients.
    pub async fn athlete_stats(&self, access_token: &str, athlete_id: i64) -> Result<Value> {
        self.get_json(access_token, &format!("athletes/{}/stats", athlete_id))
            .await
    }

    async fn token_request(&self, grant: &[(&str, &str)]) -> Result<StravaTokenResponse> {
        let mut form: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        form.extend_from_slice(grant);

        let url = format!("{}/token", self.config.oauth_base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .context("Failed to send token request to Strava")?;

        Self::parse(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, access_token: &str, endpoint: &str) -> Result<T> {
        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        debug!(%url, "Strava API request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to send request to Strava API")?;

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Strava API request failed with status {}: {}", status, text);
        }

        response.json().await.context("Failed to parse Strava API response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_authorization_url() {
        let client = StravaApiClient::new(StravaConfig {
            client_id: "123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/api/strava/callback".to_string(),
            api_base_url: "https://www.strava.com/api/v3".to_string(),
            oauth_base_url: "https://www.strava.com/oauth".to_string(),
            timeout: Duration::from_secs(30),
        })
        .unwrap();

        let url = client.authorization_url("state-token");
        assert!(url.starts_with("https://www.strava.com/oauth/authorize?client_id=123"));
        let encoded_redirect =
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fapi%2Fstrava%2Fcallback";
        assert!(url.contains(encoded_redirect));
        assert!(url.contains("scope=read,activity:read_all"));
        assert!(url.contains("approval_prompt=auto"));
        assert!(url.ends_with("state=state-token"));
    }
}
