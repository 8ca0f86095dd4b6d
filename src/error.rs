//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database errors**: any sqlx::Error from persistence operations
/// - **Authentication errors**: invalid or missing API keys
/// - **Authorization errors**: valid key, insufficient role
/// - **Resource errors**: requested records not found
/// - **Workflow errors**: decisions on already-processed payouts
/// - **Validation errors**: malformed journal entries or request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection error, query error, ...).
    ///
    /// Wraps any sqlx::Error via `#[from]`; details are hidden from clients.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// API key is missing, invalid, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// The authenticated caller's role does not grant this operation.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Insufficient role for this operation")]
    Forbidden,

    /// A referenced record does not exist.
    ///
    /// Returns HTTP 404 Not Found. The string names the missing thing
    /// ("account", "payout request", "journal transaction").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A decision was attempted on a payout request that already left the
    /// pending state. No side effect was performed.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Payout request already processed (status: {status})")]
    AlreadyProcessed { status: String },

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request; the string says what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// A journal posting whose debits and credits do not sum equally.
    ///
    /// Returns HTTP 422 Unprocessable Entity. Raised by the posting
    /// factory, never by the database.
    #[error("Unbalanced entries: debits {debits} != credits {credits}")]
    UnbalancedEntries { debits: i64, credits: i64 },
}

/// Convert AppError into an HTTP response.
///
/// Handlers return `Result<T, AppError>`; errors become JSON bodies of the
/// form:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::AlreadyProcessed { .. } => {
                (StatusCode::CONFLICT, "already_processed", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::UnbalancedEntries { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unbalanced_entries",
                self.to_string(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
