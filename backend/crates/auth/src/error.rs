//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Every unauthorized-class variant renders the same client message so a
//! caller cannot tell an unknown account from a wrong password or a replayed
//! token. The distinction survives in the machine-readable `code` and logs.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE class for operator intervention (shutdown, crash recovery)
const OPERATOR_INTERVENTION_CLASS: &str = "57";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (missing field, password policy, bad user name)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown identifier or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bad signature, wrong token kind, or structurally broken token
    #[error("Invalid token")]
    InvalidToken,

    /// Well-formed token past its expiry
    #[error("Token expired")]
    ExpiredToken,

    /// Refresh token is not the one on record
    #[error("Refresh token reuse detected")]
    TokenReuse,

    /// Token verified but the account no longer exists
    #[error("Account not found")]
    AccountNotFound,

    /// User name or email already registered
    #[error("Account already exists")]
    AccountExists,

    /// Account store timed out or is unreachable
    #[error("Account store unavailable: {0}")]
    StoreUnavailable(String),

    /// Persisted data is unusable (e.g. corrupted password hash)
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::TokenReuse
            | AuthError::AccountNotFound => ErrorKind::Unauthorized,
            AuthError::AccountExists => ErrorKind::Conflict,
            AuthError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Integrity(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "token_expired",
            AuthError::TokenReuse => "token_reuse",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::AccountExists => "account_exists",
            AuthError::StoreUnavailable(_) => "store_unavailable",
            AuthError::Integrity(_) => "integrity_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show to the client
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::TokenReuse
            | AuthError::AccountNotFound => "Unauthorized".to_string(),
            AuthError::AccountExists => "Account already exists".to_string(),
            AuthError::StoreUnavailable(_) => "Service temporarily unavailable".to_string(),
            AuthError::Integrity(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Whether the request may succeed if retried unchanged
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Whether the transport should drop the client's session cookies
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.client_message()).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::StoreUnavailable(msg) => {
                tracing::error!(message = %msg, "Account store unavailable");
            }
            AuthError::Integrity(msg) => {
                tracing::error!(message = %msg, "Auth integrity error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenReuse => {
                tracing::warn!("Refresh token reuse rejected");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        AuthError::Validation("Invalid JSON body".to_string())
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        match err {
            PasswordHashError::InvalidHashFormat => {
                AuthError::Integrity("stored password hash is malformed".to_string())
            }
            PasswordHashError::HashingFailed(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AuthError::StoreUnavailable(err.to_string())
            }
            sqlx::Error::Database(db) => match db.code() {
                Some(code) if code == UNIQUE_VIOLATION => AuthError::AccountExists,
                Some(code) if code.starts_with(OPERATOR_INTERVENTION_CLASS) => {
                    AuthError::StoreUnavailable(err.to_string())
                }
                _ => AuthError::Internal(err.to_string()),
            },
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unauthorized_class_shares_client_message() {
        let errors = [
            AuthError::InvalidCredentials,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::TokenReuse,
            AuthError::AccountNotFound,
        ];

        for err in errors {
            let app = err.to_app_error();
            assert_eq!(app.status_code(), 401);
            assert_eq!(app.message(), "Unauthorized");
            assert!(err.is_unauthorized());
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_codes_distinguish_variants() {
        assert_eq!(AuthError::TokenReuse.to_app_error().code(), "token_reuse");
        assert_eq!(AuthError::ExpiredToken.to_app_error().code(), "token_expired");
        assert_eq!(AuthError::AccountExists.to_app_error().code(), "account_exists");
    }

    #[test]
    fn test_store_unavailable_is_retryable() {
        let err = AuthError::StoreUnavailable("timeout".to_string());
        assert!(err.is_retryable());
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 503);
        assert!(!app.message().contains("timeout"));
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let app = AuthError::Integrity("hash for account 42 is garbage".to_string()).to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "Internal server error");
    }

    #[test]
    fn test_validation_message_reaches_client() {
        let err = AuthError::Validation("Password must be at least 8 characters".to_string());
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.message(), "Password must be at least 8 characters");
    }

    #[test]
    fn test_sqlx_pool_timeout_maps_to_store_unavailable() {
        let err = AuthError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
        let err = AuthError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_password_hash_format_is_integrity() {
        let err = AuthError::from(PasswordHashError::InvalidHashFormat);
        assert!(matches!(err, AuthError::Integrity(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = AuthError::AccountExists.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
