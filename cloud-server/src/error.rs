//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use severity_core::{PredictError, ValidationErrors};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Auth errors
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("sign in required")]
    Unauthorized,

    // Resource errors
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),

    // Validation errors
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("invalid fields: {0}")]
    InvalidFields(ValidationErrors),

    // Single-flight rejection
    #[error("prediction in progress")]
    PredictionInFlight,

    // Database errors
    #[error("database error: {0}")]
    DatabaseError(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::TokenInvalid
            | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) | AppError::PredictionInFlight => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl AppError {
    /// Map an insert failure, turning a unique-constraint hit into a conflict
    pub fn from_insert(err: sqlx::Error, conflict: &str) -> Self {
        if is_unique_violation(&err) {
            AppError::AlreadyExists(conflict.to_string())
        } else {
            err.into()
        }
    }
}

/// Postgres SQLSTATE 23505
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |e| e.is_unique_violation() || e.code().as_deref() == Some("23505"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::InvalidCredentials => "Invalid email or password",
            AppError::TokenExpired => "Token has expired",
            AppError::TokenInvalid => "Invalid token",
            AppError::Unauthorized => "Sign in required",
            AppError::NotFound(msg) => msg.as_str(),
            AppError::AlreadyExists(msg) => msg.as_str(),
            AppError::ValidationError(msg) => msg.as_str(),
            AppError::InvalidFields(_) => "Please correct the highlighted fields",
            AppError::PredictionInFlight => "A prediction is already in progress",
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "Database error occurred"
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error"
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        if let AppError::InvalidFields(fields) = &self {
            body["fields"] = json!(fields);
        }

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenInvalid,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Invalid(fields) => AppError::InvalidFields(fields),
            PredictError::InFlight => AppError::PredictionInFlight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_fields_carry_messages() {
        let mut fields = ValidationErrors::new();
        fields.add("speedLimit", "Speed Limit (mph) is required");

        let (status, body) = body_of(PredictError::Invalid(fields).into()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
        assert_eq!(body["fields"]["speedLimit"], "Speed Limit (mph) is required");
    }

    #[tokio::test]
    async fn test_in_flight_is_conflict() {
        let (status, body) = body_of(PredictError::InFlight.into()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "A prediction is already in progress");
        assert!(body.get("fields").is_none());
    }

    #[derive(Debug, thiserror::Error)]
    #[error("duplicate key value violates unique constraint \"users_email_key\"")]
    struct DuplicateEmail;

    impl sqlx::error::DatabaseError for DuplicateEmail {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some("23505".into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let err = sqlx::Error::Database(Box::new(DuplicateEmail));
        let (status, body) = body_of(AppError::from_insert(err, "Email already registered")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already registered");
    }

    #[test]
    fn test_other_insert_failures_stay_database_errors() {
        let err = AppError::from_insert(sqlx::Error::RowNotFound, "Email already registered");
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = body_of(AppError::DatabaseError("relation missing".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database error occurred");
    }
}
