//! Error handling for the Folio HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::{NoContext, Timestamp, Uuid};

/// JSON body of every non-2xx response: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        details: Vec<serde_json::Value>,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create a bad request error carrying field-level reasons
    pub fn invalid(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v7(Timestamp::now(NoContext));
        let status = self.status();

        let body = match self {
            AppError::NotFound { message } => ErrorBody {
                error: message,
                details: Vec::new(),
            },
            AppError::BadRequest { message, details } => ErrorBody {
                error: message,
                details,
            },
            AppError::Internal(e) => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = status.as_u16(),
                    error = ?e,
                    "request failed"
                );
                ErrorBody {
                    error: e.to_string(),
                    details: Vec::new(),
                }
            }
        };

        if status.is_client_error() {
            tracing::warn!(
                error_id = %error_id,
                status_code = status.as_u16(),
                message = %body.error,
                "request rejected"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body_is_flat() {
        let response = AppError::not_found("Book not found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Book not found"})
        );
    }

    #[tokio::test]
    async fn test_invalid_includes_details() {
        let details = vec![serde_json::json!({"field": "title", "message": "length is lower than 1"})];
        let response = AppError::invalid(details.clone(), "validation failed").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["details"], serde_json::Value::Array(details));
    }

    #[tokio::test]
    async fn test_internal_error_surfaces_message() {
        let error = AppError::Internal(anyhow::anyhow!("database connection failed"));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "database connection failed"})
        );
    }

    #[test]
    fn test_bad_request_has_no_details() {
        match AppError::bad_request("invalid book id") {
            AppError::BadRequest { message, details } => {
                assert_eq!(message, "invalid book id");
                assert!(details.is_empty());
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
