//! Card submission workflow
//!
//! `POST /submit` (also `/api/submit`) drives the whole lifecycle: collect
//! the body under the upload ceiling, validate and decode both card images,
//! run OCR on front and back concurrently, classify the combined text and
//! map the outcome onto the user-facing response. Every submission ends in
//! a terminal JSON response; nothing is persisted.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardcheck_common::{classify_raw, ClassificationResult};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Card submission body
///
/// `planType` is whatever the browser claims the plan is. It is logged for
/// diagnostics but never trusted: classification is always derived from the
/// card text server-side.
#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default, rename = "planType")]
    pub plan_type: Option<String>,
}

/// Terminal outcome of a submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "redirectLink", skip_serializing_if = "Option::is_none")]
    pub redirect_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ClassificationResult>,
}

impl SubmissionResponse {
    /// Map a classification onto the user-facing contract: a clean PPO or
    /// POS match proceeds to booking, everything else goes to self-pay.
    fn from_classification(outcome: ClassificationResult, config: &Config) -> Self {
        if outcome.conflict || !outcome.has_oon {
            Self {
                success: false,
                message: format!(
                    "Unfortunately, your insurance is not eligible for coverage at \
                     Dr. Albert’s office. You can still book a self-pay consultation \
                     here: {}",
                    config.selfpay_url
                ),
                redirect_link: Some(config.selfpay_url.clone()),
                details: Some(outcome),
            }
        } else {
            Self {
                success: true,
                message: "You’re eligible to move forward.".to_string(),
                redirect_link: Some(config.booking_url.clone()),
                details: Some(outcome),
            }
        }
    }
}

/// POST /submit and /api/submit
pub async fn submit_card(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let submission_id = Uuid::new_v4();

    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(
                %submission_id,
                limit_bytes = state.config.max_upload_bytes,
                "Submission exceeded the upload ceiling"
            );
            return ApiError::PayloadTooLarge.into_response();
        }
        Err(rejection) => {
            return ApiError::Internal(format!(
                "Failed to read submission body: {}",
                rejection.body_text()
            ))
            .into_response();
        }
    };

    match process_submission(&state, submission_id, &bytes).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn process_submission(
    state: &AppState,
    submission_id: Uuid,
    body: &[u8],
) -> ApiResult<SubmissionResponse> {
    // Malformed JSON is a server fault on this wire contract, not a 400.
    let request: SubmissionRequest = serde_json::from_slice(body)?;

    if let Some(declared) = &request.plan_type {
        tracing::debug!(
            %submission_id,
            declared_plan = %declared,
            "Ignoring client-declared plan type"
        );
    }

    let (front, back) = match (&request.front, &request.back) {
        (Some(front), Some(back)) if !front.is_empty() && !back.is_empty() => (front, back),
        _ => return Err(ApiError::MissingImages),
    };

    let front_image = decode_image("front", front)?;
    let back_image = decode_image("back", back)?;

    tracing::info!(
        %submission_id,
        front_bytes = front_image.len(),
        back_bytes = back_image.len(),
        "Starting card recognition"
    );

    // Front and back are independent; recognize both at once. Either side
    // failing fails the submission and drops the sibling call.
    let (front_text, back_text) = tokio::try_join!(
        state.ocr.recognize(&front_image),
        state.ocr.recognize(&back_image),
    )?;

    let outcome = classify_raw(&format!("{}\n{}", front_text, back_text));

    tracing::info!(
        %submission_id,
        plan_type = ?outcome.plan_type,
        has_oon = outcome.has_oon,
        conflict = outcome.conflict,
        "Card classified"
    );

    Ok(SubmissionResponse::from_classification(
        outcome,
        &state.config,
    ))
}

fn decode_image(side: &str, encoded: &str) -> ApiResult<Vec<u8>> {
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ApiError::InvalidImageData(format!("{} image: {}", side, e)))
}

/// Build submission routes
pub fn submit_routes() -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit_card))
        .route("/api/submit", post(submit_card))
}
