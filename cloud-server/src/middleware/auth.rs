//! Authentication middleware

use axum::{
    extract::{State, Request},
    middleware::Next,
    response::Response,
    http::{header::AUTHORIZATION, HeaderMap},
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use sha2::{Sha256, Digest};
use uuid::Uuid;
use severity_core::Session;
use chrono::{DateTime, Utc};

use crate::{AppState, AppError};
use crate::handlers::auth::Claims;
use crate::models::UserSession;

/// Signed-in user, extracted from the JWT and its session row
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl UserContext {
    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id,
            email: self.email.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Middleware: require a bearer token bound to a live session
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(req.headers())?;

    let claims = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default()
    )?.claims;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::TokenInvalid)?;
    let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::TokenInvalid)?;

    // Signed-out or expired sessions invalidate the token
    let session = UserSession::find_active(&state.pool, session_id, &hash_token(&token))
        .await?
        .ok_or(AppError::Unauthorized)?;

    if session.user_id != user_id {
        tracing::warn!("Token subject {} does not own session {}", user_id, session_id);
        return Err(AppError::TokenInvalid);
    }

    req.extensions_mut().insert(UserContext {
        user_id,
        session_id,
        email: claims.email,
        expires_at: session.expires_at,
    });

    Ok(next.run(req).await)
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Hex SHA-256 of a bearer token, as stored in `sessions.token_hash`
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<UserContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(extract_bearer_token(&headers("Basic abc")), Err(AppError::Unauthorized)));
        assert!(matches!(extract_bearer_token(&headers("Bearer ")), Err(AppError::Unauthorized)));
        assert!(matches!(extract_bearer_token(&HeaderMap::new()), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = hash_token("token");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("token"));
        assert_ne!(hash, hash_token("token2"));
        assert_eq!(
            hash_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
