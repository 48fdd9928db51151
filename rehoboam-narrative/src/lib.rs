//! rehoboam-narrative: lived-experience summaries.
//!
//! A month's checklist and prediction context is compressed into a fixed
//! futurist prompt and handed to a pluggable text backend. When the
//! backend errs or returns nothing, a deterministic templated summary is
//! substituted so callers always have content to show.

pub mod backend;
pub mod context;
pub mod fallback;
pub mod prompt;
pub mod service;

pub use backend::{MockBackend, NarrativeBackend, NarrativeError, OpenAiBackend};
pub use context::{ActiveNode, NarrativeContext};
pub use fallback::fallback_summary;
pub use prompt::prompt_for;
pub use service::{NarrativeOutcome, NarrativeService};
