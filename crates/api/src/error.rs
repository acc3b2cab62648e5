use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use studyquest_core::error::CoreError;
use studyquest_ledger::{ErrorClass, LedgerError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`LedgerError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A settlement or query failure from `studyquest_ledger`.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Request body failed declarative validation.
    #[error("Validation failed: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Ledger errors ---
            AppError::Ledger(err) => classify_ledger_error(err),

            // --- HTTP-specific errors ---
            AppError::Invalid(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a ledger failure onto an HTTP status by its [`ErrorClass`].
///
/// Storage failures are logged and replaced with a sanitized message.
fn classify_ledger_error(err: &LedgerError) -> (StatusCode, &'static str, String) {
    match err.class() {
        ErrorClass::Validation => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
        ErrorClass::Conflict => (StatusCode::CONFLICT, err.code(), err.to_string()),
        ErrorClass::NotFound => (StatusCode::NOT_FOUND, err.code(), err.to_string()),
        ErrorClass::Storage => {
            tracing::error!(error = %err, "Ledger storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.code(),
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_classes_map_to_statuses() {
        let cases = [
            (LedgerError::InvalidDuration(0), StatusCode::BAD_REQUEST),
            (LedgerError::AlreadyClaimed(1), StatusCode::CONFLICT),
            (LedgerError::NotJoined(1), StatusCode::NOT_FOUND),
            (
                LedgerError::Storage(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(classify_ledger_error(&err).0, status);
        }
    }

    #[test]
    fn storage_message_is_sanitised() {
        let err = LedgerError::Storage(sqlx::Error::Protocol("secret detail".into()));
        let (_, code, message) = classify_ledger_error(&err);
        assert_eq!(code, "STORAGE_FAILURE");
        assert_eq!(message, INTERNAL_MESSAGE);
    }
}
