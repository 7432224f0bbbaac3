//! Auth Error Types
//!
//! One taxonomy for the crate. Recoverable variants (`EmailTaken`,
//! `InvalidCredentials`) are intercepted by the handlers and become a flash
//! message plus a redirect; what reaches `IntoResponse` is the remainder.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::presentation::views::UserNotFoundPage;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration attempted with an already-registered email.
    ///
    /// The display text doubles as the user-facing flash message.
    #[error("Email is already registered.")]
    EmailTaken,

    /// Unknown email or wrong password. Deliberately a single variant so
    /// the caller cannot distinguish which applied.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Lookup by id with no matching user
    #[error("User not found")]
    UserNotFound,

    /// Email failed the syntactic check
    #[error("Please enter a valid email.")]
    InvalidEmail,

    /// Password hashing or hash-parsing error
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] platform::password::PasswordHashError),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidEmail => StatusCode::BAD_REQUEST,
            AuthError::PasswordHash(_) | AuthError::Template(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "database error");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "password hash error");
            }
            AuthError::Template(e) => {
                tracing::error!(error = %e, "template error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        match self {
            AuthError::UserNotFound => {
                let body = UserNotFoundPage
                    .render()
                    .unwrap_or_else(|_| "404 Not Found".to_string());
                (StatusCode::NOT_FOUND, Html(body)).into_response()
            }
            other => {
                let status = other.status_code();
                let body = status.canonical_reason().unwrap_or("Error");
                (status, body).into_response()
            }
        }
    }
}
