use serde::{Deserialize, Serialize};

/// Substituted when the model output has no `extractedText` value.
pub const NO_TEXT_EXTRACTED: &str = "No text could be extracted.";

/// A decoded image submitted for OCR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrRequest {
    pub image_data: Vec<u8>,
    /// Caller-declared MIME type. Carried for context only; the image format
    /// is always sniffed from `image_data`.
    pub mime_type: String,
}

/// Successful OCR output, serialized exactly as the HTTP success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    #[serde(rename = "extractedText")]
    pub extracted_text: String,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { extracted_text: text.into() }
    }
}

/// Raw image bytes attached to a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One schema-constrained multimodal generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_instruction: String,
    /// JSON schema the model output must follow.
    pub response_schema: serde_json::Value,
    pub image: InlineImage,
    pub declared_mime_type: String,
}
