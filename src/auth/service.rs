use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::password::{generate_reset_token, hash_password, verify_password};
use crate::auth::{
    AuthError, AuthResponse, ForgotPasswordRequest, JwtService, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest,
};
use crate::models::{validate_email, validate_password, User, UserResponse};
use crate::services::email_service::{password_reset_email, Mailer};

const USER_COLUMNS: &str =
    "id, email, password_hash, reset_token, reset_token_expires, active, created_at, updated_at";

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
    mailer: Arc<dyn Mailer>,
    public_base_url: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        db: PgPool,
        jwt_service: JwtService,
        mailer: Arc<dyn Mailer>,
        public_base_url: String,
    ) -> Self {
        Self {
            jwt_service,
            db,
            mailer,
            public_base_url,
        }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        validate_email(&email).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        let query = format!(
            "INSERT INTO users (id, email, password_hash, active, created_at, updated_at)
             VALUES ($1, $2, $3, TRUE, $4, $4)
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&email)
            .bind(&password_hash)
            .bind(now)
            .fetch_one(&self.db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AuthError::EmailAlreadyExists
                }
                _ => AuthError::Database(e),
            })?;

        info!(user_id = %user.id, "Registered new user");
        self.auth_response(user)
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        let user = self
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            return Err(AuthError::AccountDisabled);
        }

        self.auth_response(user)
    }

    /// Starts a password reset. The response is the same whether or not the
    /// email belongs to an account.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        let email = normalize_email(&request.email);
        validate_email(&email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let Some(user) = self.get_user_by_email(&email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE));
        };

        let (token, expires_at) = generate_reset_token(Utc::now());
        sqlx::query(
            "UPDATE users SET reset_token = $1, reset_token_expires = $2, updated_at = NOW() \
             WHERE id = $3",
        )
        .bind(&token)
        .bind(expires_at)
        .bind(user.id)
        .execute(&self.db)
        .await?;

        let email = password_reset_email(&user.email, &self.public_base_url, &token);
        if let Err(e) = self.mailer.send(email).await {
            error!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }

        Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE))
    }

    /// Completes a password reset with a token from `forgot_password`.
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        validate_password(&request.new_password).map_err(|e| AuthError::Validation(e.to_string()))?;

        let query = format!("SELECT {} FROM users WHERE reset_token = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&request.token)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        if !user.verify_reset_token(&request.token, Utc::now()) {
            warn!(user_id = %user.id, "Expired password reset token used");
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = hash_password(&request.new_password)?;
        sqlx::query(
            "UPDATE users SET password_hash = $1, reset_token = NULL, reset_token_expires = NULL,
             updated_at = NOW() WHERE id = $2",
        )
        .bind(&password_hash)
        .bind(user.id)
        .execute(&self.db)
        .await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(MessageResponse::new("Your password has been reset. You can now log in."))
    }

    fn auth_response(&self, user: User) -> Result<AuthResponse, AuthError> {
        let access_token = self.jwt_service.create_access_token(user.id)?;

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: UserResponse::from(user),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }
}
