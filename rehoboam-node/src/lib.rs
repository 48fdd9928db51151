//! rehoboam-node: the command-line front end for Rehoboam.
//!
//! Wires the local store, the sync gateway client, and the narrative
//! service together. The binary in `main.rs` is a thin dispatcher over
//! these modules.

pub mod checklist;
pub mod config;
pub mod notify;

pub use checklist::{ChecklistRow, ChecklistService, GatewayHandle};
pub use config::Config;
pub use notify::{LogNotifier, MemoryNotifier, Notice, Notifier, Severity};
