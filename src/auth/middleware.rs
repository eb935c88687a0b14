use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::auth::{extract_bearer_token, AuthError, JwtService, TokenKind};

/// The authenticated caller, taken from a valid bearer access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let token = extract_bearer_token(auth_header)?;
        let jwt = JwtService::from_ref(state);
        let user_id = jwt.verify(token, TokenKind::Access)?;

        Ok(AuthUser(user_id))
    }
}

/// CORS configuration; permissive outside production
pub fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, axum::http::header::CONTENT_TYPE])
    }
}
