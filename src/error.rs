use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body returned for every failed request: `{"error": "..."}`.
///
/// The client surfaces `error` verbatim, so messages here are the full
/// user-facing contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Everything a handler can fail with, mapped one-to-one onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailAlreadyRegistered,
    /// Covers both "no such email" and "wrong password". The two cases must
    /// stay indistinguishable to the caller.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("Invalid user ID")]
    InvalidIdentifier,
    #[error("Password cannot be updated here")]
    PasswordUpdateRejected,
    #[error("Service temporarily unavailable")]
    StoreUnavailable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::EmailAlreadyRegistered
            | Self::InvalidCredentials
            | Self::InvalidIdentifier
            | Self::PasswordUpdateRejected => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // A duplicate insert that raced past the application-level existence
        // check lands on the unique email index.
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some("23505") {
                return Self::EmailAlreadyRegistered;
            }
        }
        tracing::error!(error = %err, "storage error");
        Self::StoreUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_error_kinds() {
        assert_eq!(
            ApiError::Validation("Name is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::EmailAlreadyRegistered.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidIdentifier.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PasswordUpdateRejected.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::StoreUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn credentials_message_does_not_name_the_missing_side() {
        // Unknown email and wrong password must read identically.
        let msg = ApiError::InvalidCredentials.to_string();
        assert_eq!(msg, "Invalid email or password");
    }

    #[test]
    fn store_errors_map_to_generic_unavailable() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::StoreUnavailable));
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_string(&ErrorResponse {
            error: ApiError::NotFound.to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"error":"User not found"}"#);
    }
}
