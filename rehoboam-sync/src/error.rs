//! Error types for the sync gateway client.

use thiserror::Error;

/// Machine code the gateway returns when the backing table is missing
/// from its schema cache.
pub const MISSING_TABLE_CODE: &str = "PGRST205";

/// Sync gateway error.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Gateway returned an error row
    #[error("Gateway error {status}: {message}")]
    Gateway {
        status: u16,
        /// Machine code from the gateway error body, when present.
        code: Option<String>,
        message: String,
    },

    /// Local identity store failed
    #[error("Identity store error: {0}")]
    Store(#[from] rehoboam_store::StoreError),
}

impl SyncError {
    /// True when the gateway reported that the backing table does not
    /// exist yet.
    pub fn is_missing_table(&self) -> bool {
        matches!(
            self,
            SyncError::Gateway { code: Some(code), .. } if code == MISSING_TABLE_CODE
        )
    }

    /// Actionable setup instruction for errors an operator can fix.
    pub fn setup_hint(&self) -> Option<&'static str> {
        if self.is_missing_table() {
            Some(
                "Create the tech_tree_states table (see scripts/tech-tree-states.sql) \
                 and reload the gateway schema cache.",
            )
        } else {
            None
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
