//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::money::Money;

/// SQLSTATE codes PostgreSQL uses when a transaction lost a race and can be
/// re-run from the start.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Storage Errors**: `Database` and `TransactionConflict`
/// - **Resource Errors**: Requested account not found
/// - **Business Logic Errors**: Transfer rejected for lack of funds
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, constraint violation).
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The database aborted a transaction because of a concurrent one
    /// (serialization failure or deadlock).
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Transaction conflicted with a concurrent update, try again")]
    TransactionConflict,

    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account {0} not found")]
    AccountNotFound(i32),

    /// Source account cannot cover the transfer. Carries the rejected amount.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient balance to transfer {0}")]
    InsufficientBalance(Money),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    InvalidRequest(String),
}

impl AppError {
    /// Status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TransactionConflict => StatusCode::CONFLICT,
            AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientBalance(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether re-running the whole unit of work may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransactionConflict)
    }
}

/// Classify sqlx errors. Serialization failures and deadlocks become
/// `TransactionConflict` so the service can retry them.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let conflict = err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .is_some_and(|code| code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED);

        if conflict {
            AppError::TransactionConflict
        } else {
            AppError::Database(err)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "erroMsg": "Human-readable error message"
/// }
/// ```
///
/// Database details are logged and never sent to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::Database(ref err) => {
                tracing::error!("Database error: {:?}", err);
                "An internal error occurred".to_string()
            }
            ref other => other.to_string(),
        };

        (status, Json(json!({ "erroMsg": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use super::*;
    use axum::body::to_bytes;
    use sqlx::error::{DatabaseError, ErrorKind};

    /// A driver error carrying only a SQLSTATE code.
    #[derive(Debug)]
    struct SqlState(&'static str);

    impl fmt::Display for SqlState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "sqlstate {}", self.0)
        }
    }

    impl StdError for SqlState {}

    impl DatabaseError for SqlState {
        fn message(&self) -> &str {
            "simulated database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn database_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(SqlState(code)))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn each_error_kind_has_its_own_status() {
        assert_eq!(AppError::AccountNotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InsufficientBalance(Money::from_cents(100)).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::TransactionConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn only_conflicts_are_retryable() {
        assert!(AppError::TransactionConflict.is_retryable());
        assert!(!AppError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!AppError::AccountNotFound(3).is_retryable());
    }

    #[test]
    fn non_database_sqlx_errors_stay_database_errors() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn serialization_failure_and_deadlock_become_conflicts() {
        for code in [SERIALIZATION_FAILURE, DEADLOCK_DETECTED] {
            let err = AppError::from(database_error(code));
            assert!(matches!(err, AppError::TransactionConflict), "{code}");
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn other_sqlstates_stay_database_errors() {
        // check_violation, raised by the non-negative balance constraint
        let err = AppError::from(database_error("23514"));
        assert!(matches!(err, AppError::Database(sqlx::Error::Database(_))));
        assert!(!err.is_retryable());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_body_uses_erro_msg() {
        let response = AppError::InsufficientBalance(Money::from_cents(8000)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({ "erroMsg": "Insufficient balance to transfer 80.00" })
        );
    }

    #[tokio::test]
    async fn database_details_are_hidden() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "erroMsg": "An internal error occurred" })
        );
    }
}
