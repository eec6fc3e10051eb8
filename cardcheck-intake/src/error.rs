//! Error types for cardcheck-intake
//!
//! Every failure that reaches the wire becomes a `{success: false, message}`
//! JSON body, matching what the upload UI expects. Server faults keep their
//! detail in the log and show the caller only "Server error".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::OcrError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Submission arrived without one or both card images (400)
    #[error("Missing images")]
    MissingImages,

    /// Card image was not valid base64 (400)
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Static asset path escaped the web root (400)
    #[error("Bad request")]
    BadRequest,

    /// Submission body exceeded the upload ceiling (413)
    #[error("Payload too large")]
    PayloadTooLarge,

    /// OCR collaborator failure (500)
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    /// Submission body was not the expected JSON (500, per the wire contract)
    #[error("Malformed submission body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingImages => (StatusCode::BAD_REQUEST, "Missing images"),
            ApiError::InvalidImageData(_) => (StatusCode::BAD_REQUEST, "Invalid image data"),
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, "Bad request"),
            ApiError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"),
            ApiError::Ocr(_)
            | ApiError::MalformedBody(_)
            | ApiError::Internal(_)
            | ApiError::Io(_)
            | ApiError::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn input_errors_map_to_4xx() {
        assert_eq!(status_of(ApiError::MissingImages), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::InvalidImageData("front".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::PayloadTooLarge),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn faults_map_to_500_with_generic_message() {
        let error = ApiError::Ocr(OcrError::RecognitionFailed("tesseract died".into()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_json_is_a_server_fault() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert_eq!(
            status_of(ApiError::MalformedBody(parse_error)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
