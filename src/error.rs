use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::password::PasswordError;
use crate::auth::AuthError;

/// Request-level error taxonomy shared by the user-scoped handlers.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotConfigured(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Strava not connected")]
    NotConnected,
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type CoachResult<T> = Result<T, CoachError>;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl CoachError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoachError::Validation(_) => StatusCode::BAD_REQUEST,
            CoachError::NotConfigured(_) => StatusCode::CONFLICT,
            CoachError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CoachError::NotConnected => StatusCode::BAD_REQUEST,
            CoachError::Unauthorized => StatusCode::UNAUTHORIZED,
            CoachError::NotFound(_) => StatusCode::NOT_FOUND,
            CoachError::Database(_) | CoachError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for CoachError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoachError::Validation(crate::models::first_validation_message(&errors))
    }
}

impl From<AuthError> for CoachError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => CoachError::Database(e),
            AuthError::Internal(e) => CoachError::Internal(e),
            AuthError::Validation(message) => CoachError::Validation(message),
            AuthError::PasswordHashing(PasswordError::Policy(message)) => {
                CoachError::Validation(message)
            }
            AuthError::Jwt(e) => CoachError::Internal(anyhow::Error::new(e)),
            AuthError::PasswordHashing(e) => CoachError::Internal(anyhow::Error::new(e)),
            _ => CoachError::Unauthorized,
        }
    }
}

impl IntoResponse for CoachError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_label, message) = match &self {
            CoachError::Validation(message) => ("Validation failed", message.clone()),
            CoachError::NotConfigured(message) => ("Not configured", message.clone()),
            CoachError::Upstream(message) => ("Upstream service error", message.clone()),
            CoachError::NotConnected => ("Not connected", self.to_string()),
            CoachError::Unauthorized => ("Unauthorized", self.to_string()),
            CoachError::NotFound(_) => ("Not found", self.to_string()),
            CoachError::Database(e) => {
                error!(error = %e, "Database error while handling request");
                ("Internal server error", GENERIC_FAILURE.to_string())
            }
            CoachError::Internal(e) => {
                error!(error = ?e, "Internal error while handling request");
                ("Internal server error", GENERIC_FAILURE.to_string())
            }
        };

        let body = Json(json!({
            "error": error_label,
            "message": message,
        }));

        (status, body).into_response()
    }
}
