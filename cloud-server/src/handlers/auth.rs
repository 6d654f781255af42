//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use jsonwebtoken::{encode, Header, EncodingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;
use severity_core::Session;

use crate::{AppState, AppError, AppResult};
use crate::middleware::auth::{hash_token, UserContext};
use crate::models::{normalize_email, AuthResponse, Credentials, User, UserSession};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID
    pub sid: String,      // Session ID
    pub email: String,
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

/// Published on the session feed whenever a session starts or ends
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut { user_id: Uuid, email: String },
}

/// Sign-up endpoint; signs the new user in
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;
    let email = normalize_email(&req.email);

    if User::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::AlreadyExists("Email already registered".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .to_string();

    // A concurrent sign-up for the same email can still win the insert
    let user = User::create(&state.pool, &email, &password_hash)
        .await
        .map_err(|e| AppError::from_insert(e, "Email already registered"))?;
    tracing::info!("New user registered: {} ({})", user.email, user.id);

    let response = open_session(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Sign-in endpoint
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.pool, &normalize_email(&req.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    User::update_last_login(&state.pool, user.id).await?;

    Ok(Json(open_session(&state, &user).await?))
}

/// Sign-out endpoint; the bearer token stops working immediately
pub async fn signout(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<StatusCode> {
    if UserSession::revoke(&state.pool, user.session_id).await? {
        publish(&state, SessionEvent::SignedOut {
            user_id: user.user_id,
            email: user.email,
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Session check: the session behind the bearer token
pub async fn session(user: UserContext) -> Json<Session> {
    Json(user.session())
}

/// Create the session row and the token bound to it
async fn open_session(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(state.config.session_lifetime())
        .ok_or_else(|| AppError::InternalError("session expiry out of range".to_string()))?;

    let token = generate_jwt(user, session_id, now, expires_at, &state.config.jwt_secret)?;
    UserSession::create(&state.pool, session_id, user.id, &hash_token(&token), expires_at).await?;

    publish(state, SessionEvent::SignedIn(Session {
        user_id: user.id,
        email: user.email.clone(),
        expires_at,
    }));

    Ok(AuthResponse {
        token,
        expires_at,
        user: user.to_info(),
    })
}

fn publish(state: &AppState, event: SessionEvent) {
    // No subscriber is not an error
    let _ = state.sessions.send(event);
}

/// Generate JWT token
fn generate_jwt(
    user: &User,
    session_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> AppResult<String> {
    let claims = Claims {
        sub: user.id.to_string(),
        sid: session_id.to_string(),
        email: user.email.clone(),
        exp: expires_at.timestamp() as usize,
        iat: issued_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes())
    ).map_err(|e| AppError::InternalError(e.to_string()))
}
