use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::GenerationRequest;

/// A multimodal model that can answer with schema-constrained JSON text.
///
/// Built once at startup and shared read-only across requests.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Send the request and return the model's raw output text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
