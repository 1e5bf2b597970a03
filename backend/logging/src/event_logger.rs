//! OCR Event Logger
//!
//! Structured per-request events (received, completed, failed) emitted under the
//! `ocr_events` target so the JSON file layer captures them as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OcrEvent {
    Received {
        declared_mime: String,
        payload_chars: usize,
    },
    Completed {
        text_chars: usize,
    },
    Failed {
        status: u16,
        kind: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct OcrLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: OcrEvent,
}

pub struct OcrEventLogger;

impl OcrEventLogger {
    /// Redact free-text fields and build the entry that gets logged.
    pub fn entry(request_id: &str, mut event: OcrEvent) -> OcrLogEntry {
        match &mut event {
            OcrEvent::Received { declared_mime, .. } => {
                *declared_mime = redact_sensitive_data(declared_mime);
            }
            OcrEvent::Failed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            OcrEvent::Completed { .. } => {}
        }

        OcrLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(request_id: &str, event: OcrEvent) {
        let entry = Self::entry(request_id, event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "ocr_events", event = %payload, "OCR request event");
    }
}
