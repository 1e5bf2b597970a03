pub mod gemini;
pub mod mock;
pub mod ocr;

pub use gemini::GeminiClient;
pub use mock::MockGenerator;
pub use ocr::{decode_payload, parse_model_output, sniff_image, OcrService, OCR_MODEL};
