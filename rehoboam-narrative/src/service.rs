//! Narrative service: backend first, fallback always.

use std::sync::Arc;

use tracing::warn;

use crate::backend::traits::NarrativeBackend;
use crate::context::NarrativeContext;
use crate::fallback::fallback_summary;
use crate::prompt::prompt_for;

/// How a summary was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    /// The backend answered.
    Generated(String),
    /// The offline template was substituted.
    Fallback {
        text: String,
        /// Backend error, when the fallback was an error path rather
        /// than an empty answer.
        reason: Option<String>,
    },
}

impl NarrativeOutcome {
    /// The text to display, whichever path produced it.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { text, .. } => text,
        }
    }
}

/// Generates lived-experience summaries, degrading to the deterministic
/// template whenever the backend fails or returns nothing.
pub struct NarrativeService {
    backend: Arc<dyn NarrativeBackend>,
}

impl NarrativeService {
    pub fn new(backend: Arc<dyn NarrativeBackend>) -> Self {
        Self { backend }
    }

    /// Produce the summary for a month's context. Never fails: the
    /// caller always gets displayable text.
    pub async fn lived_experience(&self, context: &NarrativeContext) -> NarrativeOutcome {
        let prompt = prompt_for(context);

        match self.backend.generate(&prompt).await {
            Ok(Some(text)) => NarrativeOutcome::Generated(text),
            Ok(None) => NarrativeOutcome::Fallback {
                text: fallback_summary(context),
                reason: None,
            },
            Err(error) => {
                warn!(backend = self.backend.id(), %error, "Narrative backend failed");
                NarrativeOutcome::Fallback {
                    text: fallback_summary(context),
                    reason: Some(error.to_string()),
                }
            }
        }
    }
}
