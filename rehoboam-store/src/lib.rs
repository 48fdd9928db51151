//! rehoboam-store: local persistence for Rehoboam.
//!
//! A single SQLite file holds one JSON value per namespace (goals,
//! adoption states, identity, sync outbox). Stores are constructed with a
//! shared [`KvStore`] handle; nothing else in the workspace touches the
//! database directly.

pub mod goals;
pub mod kv;
pub mod states;

pub use goals::GoalStore;
pub use kv::{
    KvStore, GOALS_NAMESPACE, OUTBOX_NAMESPACE, STATES_NAMESPACE, USER_INSTANCE_NAMESPACE,
};
pub use states::StateStore;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database open or query failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data directory could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
