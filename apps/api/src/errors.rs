use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message for request bodies that are not valid JSON of the expected shape.
pub const INVALID_BODY_MESSAGE: &str = "Request body is not valid JSON for this endpoint.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as the failure half of the response envelope.
/// Upstream and internal details are logged here and never sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion credential is not configured.
    #[error("Completion service is not configured")]
    Configuration,

    #[error("Upstream timed out after {0:?}")]
    UpstreamTimeout(std::time::Duration),

    #[error("Upstream error: {0}")]
    UpstreamResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration => {
                tracing::error!("Analysis requested but no completion credential is configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "The analysis service is currently unavailable.".to_string(),
                )
            }
            AppError::UpstreamTimeout(after) => {
                tracing::error!("Completion timed out after {after:?}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    "Could not get a response in time. Please try again later.".to_string(),
                )
            }
            AppError::UpstreamResponse(detail) => {
                tracing::error!("Completion failed: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Could not get a response from the analysis service. Please try again later."
                        .to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Malformed or mistyped request bodies are reported through the envelope.
/// The decoder's detail is logged, never echoed.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::Validation(INVALID_BODY_MESSAGE.to_string())
    }
}
