use std::sync::Mutex;

use async_trait::async_trait;
use glyphgate_core::{GenerationError, GenerationRequest, InlineImage, StructuredGenerator};

/// A scripted generator that returns a canned answer and records what it saw.
pub struct MockGenerator {
    outcome: Result<String, GenerationError>,
    seen: Mutex<Vec<InlineImage>>,
}

impl MockGenerator {
    /// Answer every call with `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self { outcome: Ok(text.into()), seen: Mutex::new(Vec::new()) }
    }

    /// Fail every call with `err`.
    pub fn with_error(err: GenerationError) -> Self {
        Self { outcome: Err(err), seen: Mutex::new(Vec::new()) }
    }

    /// Images received so far, in call order.
    pub fn seen_images(&self) -> Vec<InlineImage> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.image.clone());
        }
        self.outcome.clone()
    }
}
