use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BackendError {
    #[error("secrets not found in {} after {}s", .path.display(), .waited.as_secs())]
    SecretsUnavailable { path: PathBuf, waited: Duration },

    #[error("failed to read secret {}: {source}", .path.display())]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret file {} is empty", .path.display())]
    EmptySecret { path: PathBuf },

    #[error("database connection failed: {0}")]
    Connection(#[source] SqlxError),

    #[error("schema initialization failed: {0}")]
    SchemaInit(#[source] SqlxError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Database not available")]
    DatabaseUnavailable,

    #[error("configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// Whether a repeated attempt could plausibly succeed.
    ///
    /// Only secret reads qualify: the mount can be mid-update between the
    /// poll and the read.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::SecretRead { .. } | BackendError::EmptySecret { .. }
        )
    }
}

impl From<figment::Error> for BackendError {
    fn from(e: figment::Error) -> Self {
        BackendError::Config(e.to_string())
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> axum::response::Response {
        let (status, (code, message)) = match self {
            BackendError::DatabaseUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ("DB_UNAVAILABLE", "Database not available"),
            ),
            BackendError::SchemaInit(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ("SCHEMA_INIT_FAILED", "Database schema initialization failed."),
            ),
            BackendError::Database(_)
            | BackendError::Connection(_)
            | BackendError::SecretsUnavailable { .. }
            | BackendError::SecretRead { .. }
            | BackendError::EmptySecret { .. }
            | BackendError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ("INTERNAL_ERROR", "An internal server error occurred."),
            ),
        };
        (
            status,
            Json(ApiErrorResponse {
                status: "error",
                error: message.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

/// Standardized API error response body.
///
/// `error` carries the human-readable message as a plain string; `code` is
/// the machine-readable classifier.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub status: &'static str,
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn unavailable_maps_to_503_with_error_field() {
        let resp = BackendError::DatabaseUnavailable.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Database not available");
        assert_eq!(json["code"], "DB_UNAVAILABLE");
    }

    #[tokio::test]
    async fn driver_errors_do_not_leak_details() {
        let resp = BackendError::Database(SqlxError::PoolTimedOut).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(!body_str.contains("pool timed out"));
        assert!(body_str.contains("INTERNAL_ERROR"));
    }

    #[test]
    fn only_secret_reads_are_retryable() {
        let read = BackendError::EmptySecret {
            path: PathBuf::from("/mnt/rds-secret/host"),
        };
        assert!(read.is_retryable());
        assert!(!BackendError::DatabaseUnavailable.is_retryable());
        assert!(
            !BackendError::SecretsUnavailable {
                path: PathBuf::from("/mnt/rds-secret"),
                waited: Duration::from_secs(60),
            }
            .is_retryable()
        );
    }
}
