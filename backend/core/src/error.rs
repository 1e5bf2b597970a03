use thiserror::Error;

use crate::types::ExtractedText;

/// Outcome of one OCR request: the extracted text or exactly one failure.
pub type OcrResult = Result<ExtractedText, OcrError>;

/// Client-caused request problems, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Request must be JSON")]
    NotJson,

    #[error("Missing image data or MIME type in request.")]
    MissingField,

    #[error("Invalid base64 format received from client.")]
    MissingPrefix,
}

/// Every way an OCR request can fail.
///
/// The `Display` text is the message returned to HTTP clients; match on the
/// variant, not on that text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcrError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payload was not valid base64 or not a recognizable image.
    #[error("Internal Server Error: {class}. Details: {details}")]
    Decode { class: &'static str, details: String },

    /// The model service rejected the call (auth, quota, server fault).
    #[error("API Error: {class}. Check your API key or usage limits.")]
    ExternalApi { class: &'static str },

    #[error("Internal Server Error: {class}. Details: {details}")]
    Unexpected { class: &'static str, details: String },
}

impl OcrError {
    pub fn decode(class: &'static str, details: impl Into<String>) -> Self {
        Self::Decode { class, details: details.into() }
    }

    pub fn unexpected(class: &'static str, details: impl Into<String>) -> Self {
        Self::Unexpected { class, details: details.into() }
    }

    /// HTTP status the gateway answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Decode { .. } | Self::ExternalApi { .. } | Self::Unexpected { .. } => 500,
        }
    }

    /// Short machine-readable label used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Decode { .. } => "decode",
            Self::ExternalApi { .. } => "external_api",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

/// Failure reported by a [`StructuredGenerator`](crate::StructuredGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service answered with an error status.
    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered successfully but without usable text.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Error class reported to clients for API-level failures.
    pub fn api_class(status: u16) -> &'static str {
        if (400..500).contains(&status) {
            "ClientError"
        } else {
            "ServerError"
        }
    }
}

impl From<GenerationError> for OcrError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Api { status, .. } => OcrError::ExternalApi {
                class: GenerationError::api_class(status),
            },
            GenerationError::Transport(details) => OcrError::unexpected("TransportError", details),
            GenerationError::MalformedResponse(details) => {
                OcrError::unexpected("EmptyModelResponse", details)
            }
        }
    }
}
