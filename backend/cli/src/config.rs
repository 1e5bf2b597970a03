use std::path::PathBuf;

use glyphgate_gateway::server::DEFAULT_MAX_BODY_BYTES;
use glyphgate_understanding::gemini::DEFAULT_BASE_URL;
use serde::Deserialize;

/// GlyphGate runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Gemini API key; the server refuses to start without it
    pub gemini_api_key: Option<String>,
    /// Gemini REST base URL
    pub gemini_base_url: String,
    /// Directory holding `index.html`
    pub static_dir: PathBuf,
    /// Directory for rolling JSON logs
    pub log_dir: PathBuf,
    /// Log level
    pub log_level: String,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            gemini_api_key: None,
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            static_dir: PathBuf::from("."),
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` (useful for testing).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_address: lookup("GLYPHGATE_BIND").unwrap_or(defaults.bind_address),
            port: lookup("GLYPHGATE_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            static_dir: lookup("GLYPHGATE_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            log_dir: lookup("GLYPHGATE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            max_body_bytes: lookup("GLYPHGATE_MAX_BODY_BYTES")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}
