//! Structured logging for GlyphGate.
//!
//! Handles log redaction, JSON file output with daily rotation, and OCR request event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{OcrEvent, OcrEventLogger, OcrLogEntry};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
