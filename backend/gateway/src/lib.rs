//! GlyphGate HTTP Gateway
//!
//! Serves the OCR endpoint, the static front-end page, and a health probe.

pub mod control_ui;
pub mod ocr_api;
pub mod server;

pub use ocr_api::{parse_submission, OcrSubmission};
pub use server::{build_router, start_server, GatewayState};
