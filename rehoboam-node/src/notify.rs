//! User-facing notices.
//!
//! Remote failures never crash anything; they surface once through a
//! [`Notifier`] and the session continues on last known good local state.

use std::sync::Mutex;

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A one-shot, non-blocking notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub summary: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn info(summary: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            severity: Severity::Info,
            summary: summary.into(),
            detail,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail,
        }
    }

    pub fn error(summary: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail,
        }
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier backed by the tracing subscriber.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        let detail = notice.detail.as_deref().unwrap_or("");
        match notice.severity {
            Severity::Info => info!(summary = %notice.summary, detail, "notice"),
            Severity::Warning => warn!(summary = %notice.summary, detail, "notice"),
            Severity::Error => error!(summary = %notice.summary, detail, "notice"),
        }
    }
}

/// Collects notices in memory. Used by tests.
#[derive(Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notifier lock poisoned").push(notice);
    }
}
