//! Core trait for narrative text backends.

use async_trait::async_trait;

/// Error types for narrative generation.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    /// Backend is not available
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Parsing error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// A text-generation backend.
///
/// Returning `Ok(None)` means the backend answered but produced nothing
/// usable; callers substitute the deterministic fallback in that case
/// exactly as they do on an error.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Backend identifier (typically the model name).
    fn id(&self) -> &str;

    /// Generate text for a free-form prompt.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, NarrativeError>;
}
