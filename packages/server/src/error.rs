//! API error type: operational (4xx with message) versus unexpected (500).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients as an `{error: ...}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-input problem, surfaced as 400 with the message.
    #[error("{0}")]
    BadRequest(String),

    /// Missing resource, surfaced as 404.
    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected, surfaced as 500. The public message is fixed;
    /// the underlying cause is logged and (in debug builds only) attached
    /// as `detail`.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Internal { message, source } => {
                tracing::error!(
                    error = source.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                    "internal server error"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
        };

        let mut body = json!({ "error": message });

        // Never leak internals in release builds
        #[cfg(debug_assertions)]
        if let ApiError::Internal {
            source: Some(source),
            ..
        } = &self
        {
            body["detail"] = json!(format!("{source:#}"));
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_variants() {
        let response = ApiError::BadRequest("bad url".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::NotFound("Record not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::internal(
            "Failed to process extraction request",
            anyhow::anyhow!("boom"),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
