//!
//! # Custom Error Handling
//!
//! Two layers of errors live here.
//!
//! `CoreError` is what the matching engine, the statistics aggregator and the
//! account use cases return: a structured reason the caller can act on, never an
//! opaque failure. It knows nothing about HTTP.
//!
//! `AppError` is the transport-level error. It implements
//! `actix_web::error::ResponseError` to turn failures into JSON responses, and
//! provides `From` conversions for `CoreError`, `StoreError`, `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error` and
//! `bcrypt::BcryptError` so handlers can use the `?` operator throughout.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Failures of the matching, statistics and account operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Job not found")]
    JobNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Match not found")]
    MatchNotFound,

    /// The user's role does not permit the operation (e.g. matching an admin).
    #[error("User must be a Talent to be matched")]
    InvalidRole,

    /// A match for this job and user already exists, whatever its status.
    #[error("User is already matched to this job")]
    DuplicateMatch,

    #[error("Match is already completed")]
    MatchAlreadyCompleted,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already verified")]
    EmailAlreadyVerified,

    #[error("Invalid or expired verification code")]
    InvalidVerificationCode,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    /// bcrypt failed to hash or check a password.
    #[error("{0}")]
    PasswordHash(String),

    #[error("{0}")]
    TokenSigning(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> CoreError {
        match error {
            StoreError::DuplicateMatch => CoreError::DuplicateMatch,
            StoreError::DuplicateEmail => CoreError::UserAlreadyExists,
            other => CoreError::Store(other),
        }
    }
}

/// Represents all possible errors that can occur at the HTTP boundary.
///
/// Each variant corresponds to a specific type of error, carrying a message
/// detailing the issue. These errors are then converted into HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but their role does not allow the action (HTTP 403).
    Forbidden(String),
    /// Malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// The requested resource was not found (HTTP 404).
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error originating from the store (HTTP 500).
    DatabaseError(String),
    /// Input validation failed (HTTP 422 Unprocessable Entity).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // Store details stay in the logs.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Database error"
                }))
            }
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
        }
    }
}

/// Maps core failures onto HTTP semantics.
///
/// Missing entities become 404. Business-rule violations (wrong role, duplicate
/// match, bad codes) become 400, as do bad credentials.
impl From<CoreError> for AppError {
    fn from(error: CoreError) -> AppError {
        let msg = error.to_string();
        match error {
            CoreError::JobNotFound | CoreError::UserNotFound | CoreError::MatchNotFound => {
                AppError::NotFound(msg)
            }
            CoreError::InvalidRole
            | CoreError::DuplicateMatch
            | CoreError::MatchAlreadyCompleted
            | CoreError::UserAlreadyExists
            | CoreError::InvalidCredentials
            | CoreError::EmailAlreadyVerified
            | CoreError::InvalidVerificationCode
            | CoreError::InvalidResetToken => AppError::BadRequest(msg),
            CoreError::PasswordHash(_) | CoreError::TokenSigning(_) => {
                AppError::InternalServerError(msg)
            }
            CoreError::Store(inner) => AppError::from(inner),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateMatch | StoreError::DuplicateEmail => {
                AppError::from(CoreError::from(error))
            }
            StoreError::MissingReference => AppError::BadRequest(error.to_string()),
            StoreError::Database(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`; everything else is
/// classified by the store first.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            other => AppError::from(StoreError::from(other)),
        }
    }
}

/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("Admin role required".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Resource not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::DatabaseError("connection reset".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_core_error_mapping() {
        let cases = [
            (CoreError::JobNotFound, 404),
            (CoreError::UserNotFound, 404),
            (CoreError::MatchNotFound, 404),
            (CoreError::InvalidRole, 400),
            (CoreError::DuplicateMatch, 400),
            (CoreError::InvalidCredentials, 400),
            (CoreError::PasswordHash("bad cost".into()), 500),
            (CoreError::TokenSigning("bad key".into()), 500),
            (CoreError::Store(StoreError::Database("boom".into())), 500),
        ];
        for (error, status) in cases {
            let label = error.to_string();
            let response = AppError::from(error).error_response();
            assert_eq!(response.status(), status, "{}", label);
        }
    }

    #[test]
    fn test_store_duplicates_become_domain_errors() {
        assert!(matches!(
            CoreError::from(StoreError::DuplicateMatch),
            CoreError::DuplicateMatch
        ));
        assert!(matches!(
            CoreError::from(StoreError::DuplicateEmail),
            CoreError::UserAlreadyExists
        ));
    }
}
