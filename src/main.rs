use std::sync::Arc;

use thrshld::api::create_routes;
use thrshld::cache::{Cache, InMemoryCache, RedisCache};
use thrshld::config::{run_migrations, AppConfig, DatabaseConfig};
use thrshld::repository::PgStore;
use thrshld::services::{LogMailer, Mailer, OpenAiClient, SmtpMailer};
use thrshld::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How often the in-process cache drops expired entries.
const CACHE_CLEANUP_INTERVAL_SECS: u64 = 300;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("thrshld=debug,tower_http=info"));
    let json_logs = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

async fn build_cache(redis_url: Option<&str>) -> Arc<dyn Cache> {
    if let Some(url) = redis_url {
        match RedisCache::connect(url).await {
            Ok(cache) => return Arc::new(cache),
            Err(e) => warn!(error = %e, "Redis unavailable, falling back to in-memory cache"),
        }
    }

    let cache = InMemoryCache::new();
    let sweeper = cache.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(CACHE_CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            sweeper.cleanup_expired().await;
        }
    });
    Arc::new(cache)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    if config.is_production() && config.jwt_secret == "your-secret-key-change-in-production" {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;
    info!("Database ready");

    let cache = build_cache(config.cache.redis_url.as_deref()).await;
    let completion = Arc::new(OpenAiClient::new(config.openai.clone())?);
    let mailer: Arc<dyn Mailer> = match config.smtp.clone() {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp)),
        None => {
            warn!("SMTP not configured; password reset emails will be logged");
            Arc::new(LogMailer)
        }
    };

    let state = AppState::new(&config, PgStore::new(pool), cache, completion, mailer)?;
    let app = create_routes(state, !config.is_production());

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("THRSHLD server starting on http://{}", config.server_address());
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
