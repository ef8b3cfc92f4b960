/**
 * API Error Types
 *
 * This module defines the error types returned by HTTP handlers and
 * database operations. Every domain rule violation maps to a variant
 * with a stable HTTP status; storage failures collapse into `Database`.
 *
 * # Race Mapping
 *
 * Duplicate-key errors that slip past application pre-checks (e.g. two
 * concurrent "create collaboration request" calls racing on the partial
 * unique index) are mapped to `Conflict` in the `From<sqlx::Error>`
 * impl rather than surfacing as a generic server error. Callers may
 * retry with fresh state.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Domain error taxonomy for the API
///
/// Each variant carries a human-readable message and maps to exactly
/// one HTTP status code via [`ApiError::status_code`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input; no state change
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (wrong actor type, not the owner)
    #[error("{0}")]
    Forbidden(String),

    /// Entity absent
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key or lost race; safe to retry with fresh state
    #[error("{0}")]
    Conflict(String),

    /// Entity exists but is in the wrong state for this operation
    /// (event already past, request no longer pending)
    #[error("{0}")]
    InvalidState(String),

    /// Storage or transaction failure; all writes rolled back
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` / `InvalidState` - 400 Bad Request
    /// - `Unauthorized` - 401 Unauthorized
    /// - `Forbidden` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - `Database` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message to expose to the client
    ///
    /// Database errors are masked with a generic message; the real
    /// error is logged at the conversion boundary.
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    /// Map storage errors onto the domain taxonomy
    ///
    /// - `RowNotFound` becomes `NotFound`
    /// - unique-constraint violations become `Conflict` (races that
    ///   pre-checks cannot catch)
    /// - everything else is a `Database` failure
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("Not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict("Duplicate entry".to_string())
            }
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad input").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("not yours").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("taken").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::invalid_state("event already past").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        match err {
            ApiError::NotFound(_) => {}
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_database_error_masks_message() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_client_error_message_passthrough() {
        let err = ApiError::conflict("You already have a pending request for this event");
        assert_eq!(
            err.message(),
            "You already have a pending request for this event"
        );
    }
}
