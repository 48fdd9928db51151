//! rehoboam-sync: client for the Rehoboam sync gateway.
//!
//! The gateway is a generic REST table with optional bearer auth. The
//! core only needs two calls: fetch all records for a user, and upsert a
//! batch keyed by (user, node, effective year, effective month). Failures
//! come back as structured [`SyncError`]s so callers can surface
//! actionable notices; nothing here retries.

pub mod client;
pub mod config;
pub mod error;
pub mod identity;

pub use client::{GatewayClient, StateRow};
pub use config::{AuthSession, GatewayConfig};
pub use error::{Result, SyncError, MISSING_TABLE_CODE};
pub use identity::resolve_user_id;
