//! OCR Endpoint (`POST /run-ocr`).
//!
//! Validates the submitted data-URI, hands the payload to the [`OcrService`],
//! and maps the outcome onto a JSON response.
//!
//! [`OcrService`]: glyphgate_understanding::OcrService

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::debug;

use glyphgate_core::{OcrError, ValidationError};
use glyphgate_logging::{OcrEvent, OcrEventLogger};

use crate::server::GatewayState;

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSubmission {
    /// Base64 text after the first comma of `imageBase64`.
    pub payload: String,
    pub mime_type: String,
}

/// Wire wrapper turning an [`OcrError`] into `{"error": ...}` with its status.
pub struct ApiError(pub OcrError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Run the three request checks in order and extract the payload.
pub fn parse_submission(headers: &HeaderMap, body: &[u8]) -> Result<OcrSubmission, ValidationError> {
    if !is_json_content_type(headers) {
        return Err(ValidationError::NotJson);
    }
    let value: Value = serde_json::from_slice(body).map_err(|_| ValidationError::NotJson)?;

    let (Some(data_uri), Some(mime_type)) = (
        non_empty_str(&value, "imageBase64"),
        non_empty_str(&value, "fileMimeType"),
    ) else {
        return Err(ValidationError::MissingField);
    };

    let (_prefix, payload) = data_uri.split_once(',').ok_or(ValidationError::MissingPrefix)?;

    Ok(OcrSubmission {
        payload: payload.to_string(),
        mime_type: mime_type.to_string(),
    })
}

/// Handler for `POST /run-ocr`.
///
/// Body rejections (e.g. over the size limit) keep their status but answer in
/// the same `{"error": ...}` shape as every other failure.
pub async fn run_ocr(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let status = rejection.status();
            let message = rejection.body_text();
            OcrEventLogger::log_event(
                &request_id,
                OcrEvent::Failed {
                    status: status.as_u16(),
                    kind: "body_rejected".to_string(),
                    error_msg: message.clone(),
                },
            );
            return (status, Json(json!({ "error": message }))).into_response();
        }
    };

    let result = match parse_submission(&headers, &body) {
        Ok(submission) => {
            OcrEventLogger::log_event(
                &request_id,
                OcrEvent::Received {
                    declared_mime: submission.mime_type.clone(),
                    payload_chars: submission.payload.len(),
                },
            );
            state.ocr.run(&submission.payload, &submission.mime_type).await
        }
        Err(e) => {
            debug!(request_id = %request_id, error = %e, "Rejected OCR request");
            Err(OcrError::from(e))
        }
    };

    match result {
        Ok(text) => {
            OcrEventLogger::log_event(
                &request_id,
                OcrEvent::Completed { text_chars: text.extracted_text.chars().count() },
            );
            (StatusCode::OK, Json(text)).into_response()
        }
        Err(err) => {
            OcrEventLogger::log_event(
                &request_id,
                OcrEvent::Failed {
                    status: err.status_code(),
                    kind: err.kind().to_string(),
                    error_msg: err.to_string(),
                },
            );
            ApiError(err).into_response()
        }
    }
}
