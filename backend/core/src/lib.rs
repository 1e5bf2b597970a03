pub mod error;
pub mod traits;
pub mod types;

pub use error::{GenerationError, OcrError, OcrResult, ValidationError};
pub use traits::StructuredGenerator;
pub use types::{ExtractedText, GenerationRequest, InlineImage, OcrRequest, NO_TEXT_EXTRACTED};
