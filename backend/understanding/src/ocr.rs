//! Optical Character Recognition (OCR)
//!
//! Turns a base64 image payload into a schema-constrained call against a
//! vision model and normalizes the answer, or any failure, into an
//! [`OcrResult`].

use std::sync::Arc;

use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use glyphgate_core::{
    ExtractedText, GenerationRequest, InlineImage, OcrError, OcrRequest, OcrResult,
    StructuredGenerator, NO_TEXT_EXTRACTED,
};

pub const OCR_MODEL: &str = "gemini-2.5-flash";

const SYSTEM_INSTRUCTION: &str = "You are an AI-powered text recognition engine specialized in \
high-accuracy OCR, particularly for handwritten text. Extract all text from the image.";

const USER_INSTRUCTION: &str = "Extract all text from the image, including line breaks, and return \
the result as a single JSON object structured exactly as requested. Focus on accurate text \
extraction regardless of the text's style (handwritten or printed). The extracted text must use \
\\n for line breaks for proper JSON escaping.";

/// Response shape: one object with a single string field `extractedText`.
pub fn ocr_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "extractedText": {
                "type": "STRING",
                "description": "The complete, accurately extracted text from the image, \
preserving line breaks. Use \\n for line breaks."
            }
        },
        "required": ["extractedText"]
    })
}

/// Standard alphabet, canonical padding, non-zero trailing bits tolerated.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode a standard-alphabet base64 payload.
///
/// Characters outside the alphabet (whitespace, stray punctuation) are dropped
/// before decoding; padding must still line up.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, OcrError> {
    let compact: String = payload
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    LENIENT_STANDARD
        .decode(compact)
        .map_err(|e| OcrError::decode("DecodeError", e.to_string()))
}

/// Identify the image format from its leading bytes.
///
/// Only the header is inspected; pixel decoding is left to the model.
pub fn sniff_image(bytes: &[u8]) -> Result<InlineImage, OcrError> {
    let format = image::guess_format(bytes)
        .map_err(|e| OcrError::decode("ImageError", e.to_string()))?;
    Ok(InlineImage {
        mime_type: format.to_mime_type().to_string(),
        data: bytes.to_vec(),
    })
}

/// Read `extractedText` out of the model's JSON answer.
pub fn parse_model_output(text: &str) -> OcrResult {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| OcrError::unexpected("MalformedModelOutput", e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(OcrError::unexpected(
            "MalformedModelOutput",
            "model output is not a JSON object",
        ));
    };

    let extracted = match map.get("extractedText") {
        None | Some(Value::Null) => NO_TEXT_EXTRACTED.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Ok(ExtractedText::new(extracted))
}

/// The OCR invoker. Cheap to share; holds only the generator handle.
pub struct OcrService {
    generator: Arc<dyn StructuredGenerator>,
}

impl OcrService {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Decode `payload` and run OCR on it.
    pub async fn run(&self, payload: &str, mime_type: &str) -> OcrResult {
        let request = OcrRequest {
            image_data: decode_payload(payload).inspect_err(log_failure)?,
            mime_type: mime_type.to_string(),
        };
        self.extract_text(&request).await
    }

    /// Run OCR on an already decoded image.
    pub async fn extract_text(&self, request: &OcrRequest) -> OcrResult {
        let result = self.invoke(request).await;
        if let Err(e) = &result {
            log_failure(e);
        }
        result
    }

    async fn invoke(&self, request: &OcrRequest) -> OcrResult {
        let image = sniff_image(&request.image_data)?;
        info!(
            provider = self.generator.name(),
            declared_mime = %request.mime_type,
            detected_mime = %image.mime_type,
            bytes = image.data.len(),
            "Running OCR on submitted image"
        );

        let generation = GenerationRequest {
            model: OCR_MODEL.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_instruction: USER_INSTRUCTION.to_string(),
            response_schema: ocr_response_schema(),
            image,
            declared_mime_type: request.mime_type.clone(),
        };

        let output = self.generator.generate(&generation).await.map_err(|e| {
            warn!(provider = self.generator.name(), error = %e, "Model call failed");
            OcrError::from(e)
        })?;
        parse_model_output(&output)
    }
}

fn log_failure(err: &OcrError) {
    warn!(kind = err.kind(), error = %err, "OCR request failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;
    use glyphgate_core::GenerationError;

    const PNG_SIGNATURE_B64: &str = "iVBORw0KGgo=";
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn service(mock: MockGenerator) -> (OcrService, Arc<MockGenerator>) {
        let mock = Arc::new(mock);
        (OcrService::new(mock.clone()), mock)
    }

    #[test]
    fn decodes_standard_base64_ignoring_whitespace() {
        assert_eq!(decode_payload("iVBORw0K\nGgo=").unwrap(), PNG_SIGNATURE.to_vec());
    }

    #[test]
    fn drops_characters_outside_the_alphabet() {
        assert_eq!(decode_payload("iVBO*Rw0K Ggo=\r\n").unwrap(), PNG_SIGNATURE.to_vec());
    }

    #[test]
    fn tolerates_nonzero_trailing_bits() {
        assert_eq!(decode_payload("QR==").unwrap(), b"A".to_vec());
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_payload("not base64!").unwrap_err();
        assert!(matches!(err, OcrError::Decode { class: "DecodeError", .. }));
        assert!(err.to_string().starts_with("Internal Server Error: DecodeError. Details: "));
    }

    #[test]
    fn sniffs_format_from_bytes() {
        let image = sniff_image(&PNG_SIGNATURE).unwrap();
        assert_eq!(image.mime_type, "image/png");

        let jpeg = sniff_image(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");
    }

    #[test]
    fn unknown_bytes_are_image_errors() {
        let err = sniff_image(b"plain text, not an image").unwrap_err();
        assert!(matches!(err, OcrError::Decode { class: "ImageError", .. }));
    }

    #[test]
    fn model_output_preserves_line_breaks() {
        let out = parse_model_output(r#"{"extractedText": "Hello\nWorld"}"#).unwrap();
        assert_eq!(out.extracted_text, "Hello\nWorld");
    }

    #[test]
    fn missing_or_null_text_uses_placeholder() {
        assert_eq!(parse_model_output("{}").unwrap().extracted_text, NO_TEXT_EXTRACTED);
        assert_eq!(
            parse_model_output(r#"{"extractedText": null}"#).unwrap().extracted_text,
            NO_TEXT_EXTRACTED
        );
    }

    #[test]
    fn malformed_model_output_is_unexpected() {
        let err = parse_model_output("Sure! Here is the text").unwrap_err();
        assert!(matches!(err, OcrError::Unexpected { class: "MalformedModelOutput", .. }));

        let err = parse_model_output(r#"["a", "b"]"#).unwrap_err();
        assert_eq!(err.kind(), "unexpected");
    }

    #[test]
    fn schema_requires_single_string_field() {
        let schema = ocr_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["extractedText"]["type"], "STRING");
        assert_eq!(schema["properties"].as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn forwards_decoded_bytes_with_detected_mime() {
        let (svc, mock) = service(MockGenerator::with_response(r#"{"extractedText": "Test"}"#));
        let out = svc.run(PNG_SIGNATURE_B64, "image/jpeg").await.unwrap();
        assert_eq!(out, ExtractedText::new("Test"));

        let seen = mock.seen_images();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].data, PNG_SIGNATURE.to_vec());
        assert_eq!(seen[0].mime_type, "image/png");
    }

    #[tokio::test]
    async fn api_errors_become_external_api_failures() {
        let (svc, _) = service(MockGenerator::with_error(GenerationError::Api {
            status: 401,
            message: "unauthenticated".into(),
        }));
        let err = svc.run(PNG_SIGNATURE_B64, "image/png").await.unwrap_err();
        assert_eq!(err, OcrError::ExternalApi { class: "ClientError" });
        assert!(err.to_string().contains("API Error"));
    }

    #[tokio::test]
    async fn decode_failures_never_reach_the_model() {
        let (svc, mock) = service(MockGenerator::with_response("{}"));
        let err = svc.run("%%%", "image/png").await.unwrap_err();
        assert_eq!(err.kind(), "decode");
        assert!(mock.seen_images().is_empty());
    }

    #[tokio::test]
    async fn repeated_runs_yield_identical_results() {
        let (svc, _) = service(MockGenerator::with_response(r#"{"extractedText": "same"}"#));
        let first = svc.run(PNG_SIGNATURE_B64, "image/png").await;
        let second = svc.run(PNG_SIGNATURE_B64, "image/png").await;
        assert_eq!(first, second);

        let (failing, _) = service(MockGenerator::with_error(GenerationError::Transport(
            "reset".into(),
        )));
        let first = failing.run(PNG_SIGNATURE_B64, "image/png").await;
        let second = failing.run(PNG_SIGNATURE_B64, "image/png").await;
        assert_eq!(first, second);
    }
}
