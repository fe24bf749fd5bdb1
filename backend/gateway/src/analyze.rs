//! Image analysis endpoint (`POST /analyze-image`).
//!
//! Decodes the still from its data URI, runs text detection and maps the provider's
//! annotations into the simplified result.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use logging::redact_sensitive_data;
use textcam_core::{AnalyzeResponse, CapturedImage, ConfigError, ImageInputError, RecognitionResult, UpstreamError};

use crate::server::{GatewayState, RecognizerSlot};

/// Failures of one analysis request, each with a fixed user-facing message.
#[derive(Debug)]
pub enum AnalyzeError {
    Unavailable(ConfigError),
    Input(ImageInputError),
    Upstream(UpstreamError),
}

impl From<ImageInputError> for AnalyzeError {
    fn from(e: ImageInputError) -> Self {
        Self::Input(e)
    }
}

impl From<UpstreamError> for AnalyzeError {
    fn from(e: UpstreamError) -> Self {
        Self::Upstream(e)
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unavailable(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.user_message().to_string()),
            Self::Input(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Upstream(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.user_message().to_string()),
        };
        (status, Json(AnalyzeResponse::failure(message))).into_response()
    }
}

/// Handler for `POST /analyze-image`.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn analyze_image(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    let recognizer = match &state.recognizer {
        RecognizerSlot::Ready(recognizer) => recognizer.clone(),
        RecognizerSlot::Unavailable(reason) => {
            warn!(reason = %reason, "Refusing analysis: recognizer not initialized");
            return Err(AnalyzeError::Unavailable(reason.clone()));
        }
    };

    let body = body.map_err(reject_body)?;
    let image = extract_image(&body)?;
    let captured = CapturedImage::from_data_uri(&image)?;

    info!(
        mime = %captured.mime,
        bytes = captured.len(),
        provider = recognizer.name(),
        "Analyzing image"
    );

    let annotations = recognizer.detect_text(&captured.bytes).await.map_err(|e| {
        error!(
            kind = ?e.kind,
            detail = %redact_sensitive_data(&e.detail),
            "Text detection failed"
        );
        AnalyzeError::from(e)
    })?;

    info!(annotations = annotations.len(), "Analysis complete");

    let result = RecognitionResult::from_annotations(annotations);
    debug!(full_text = %result.full_text, fragments = result.fragments.len(), "Mapped recognition result");

    Ok(Json(AnalyzeResponse::success(&result)))
}

/// Body extraction failures still answer with the JSON failure record.
fn reject_body(rejection: BytesRejection) -> ImageInputError {
    warn!(status = %rejection.status(), reason = %rejection.body_text(), "Rejected request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImageInputError::TooLarge
    } else {
        ImageInputError::InvalidBody
    }
}

/// Pulls the `image` string out of the JSON body.
fn extract_image(body: &[u8]) -> Result<String, ImageInputError> {
    let request: Value = serde_json::from_slice(body).map_err(|_| ImageInputError::InvalidBody)?;

    match request.get("image") {
        None | Some(Value::Null) => Err(ImageInputError::Missing),
        Some(Value::String(s)) if s.is_empty() => Err(ImageInputError::Missing),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ImageInputError::InvalidFormat),
    }
}
