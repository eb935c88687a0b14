use anyhow::Result;
use std::env;
use std::time::Duration;

use crate::analytics::ReadinessPolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    /// Base URL used when building links sent to users (password reset).
    pub public_base_url: String,
    pub cache: CacheConfig,
    pub openai: OpenAiConfig,
    pub strava: StravaConfig,
    pub smtp: Option<SmtpConfig>,
    pub readiness: ReadinessPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(AppConfig {
            host,
            port,
            environment,
            jwt_secret,
            public_base_url,
            cache: CacheConfig::from_env(),
            openai: OpenAiConfig::from_env(),
            strava: StravaConfig::from_env(),
            smtp: SmtpConfig::from_env(),
            readiness: readiness_from_env(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis is used when set, otherwise entries live in process memory.
    pub redis_url: Option<String>,
    pub ttl: Duration,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let ttl_seconds = env_parse("CACHE_TTL_SECONDS", 3600u64);

        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            max_tokens: env_parse("OPENAI_MAX_TOKENS", 800),
            temperature: env_parse("OPENAI_TEMPERATURE", 0.7),
            timeout: Duration::from_secs(env_parse("OPENAI_TIMEOUT_SECONDS", 30)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StravaConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub api_base_url: String,
    pub oauth_base_url: String,
    pub timeout: Duration,
}

impl StravaConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("STRAVA_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("STRAVA_CLIENT_SECRET").unwrap_or_default(),
            redirect_uri: env::var("STRAVA_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:3000/api/strava/callback".to_string()),
            api_base_url: "https://www.strava.com/api/v3".to_string(),
            oauth_base_url: "https://www.strava.com/oauth".to_string(),
            timeout: Duration::from_secs(env_parse("STRAVA_TIMEOUT_SECONDS", 30)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    /// Returns `None` when no SMTP host is configured.
    pub fn from_env() -> Option<Self> {
        let host = env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;

        Some(Self {
            host,
            username: env::var("SMTP_USERNAME").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "THRSHLD <noreply@thrshld.app>".to_string()),
        })
    }
}

fn readiness_from_env() -> ReadinessPolicy {
    let defaults = ReadinessPolicy::default();

    ReadinessPolicy {
        high_load: env_parse("READINESS_HIGH_LOAD", defaults.high_load),
        moderate_load: env_parse("READINESS_MODERATE_LOAD", defaults.moderate_load),
    }
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
