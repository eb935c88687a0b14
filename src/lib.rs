pub mod analytics;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

pub use error::{CoachError, CoachResult};
pub use state::AppState;
