// Environment-driven configuration

pub mod app;
pub mod database;

pub use app::{AppConfig, CacheConfig, OpenAiConfig, SmtpConfig, StravaConfig};
pub use database::{run_migrations, DatabaseConfig};
