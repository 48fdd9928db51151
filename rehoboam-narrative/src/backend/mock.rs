//! Mock narrative backend for tests.

use async_trait::async_trait;

use super::traits::{NarrativeBackend, NarrativeError};

/// Canned-response backend.
pub struct MockBackend {
    response: Result<Option<String>, String>,
}

impl MockBackend {
    /// Always answers with the given text.
    pub fn answering(text: impl Into<String>) -> Self {
        Self {
            response: Ok(Some(text.into())),
        }
    }

    /// Answers but produces nothing usable.
    pub fn empty() -> Self {
        Self { response: Ok(None) }
    }

    /// Fails every request.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
        }
    }
}

#[async_trait]
impl NarrativeBackend for MockBackend {
    fn id(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<Option<String>, NarrativeError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(NarrativeError::RequestFailed(message.clone())),
        }
    }
}
