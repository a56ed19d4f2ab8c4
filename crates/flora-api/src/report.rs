//! Reporting sink for user-visible events
//!
//! The session reports through an injected [`Reporter`] instead of writing to
//! a global log. [`TracingReporter`] forwards to `tracing`; [`MemoryReporter`]
//! keeps a bounded, timestamped history that the front end can display.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Entries kept by [`MemoryReporter::new`]
pub const DEFAULT_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

pub trait Reporter: Send + Sync {
    fn report(&self, level: ReportLevel, message: &str, context: Value);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: ReportLevel, message: &str, context: Value) {
        match level {
            ReportLevel::Debug => tracing::debug!(context = %context, "{message}"),
            ReportLevel::Info => tracing::info!(context = %context, "{message}"),
            ReportLevel::Warning => tracing::warn!(context = %context, "{message}"),
            ReportLevel::Error => tracing::error!(context = %context, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub level: ReportLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub context: Value,
}

#[derive(Debug, Default)]
struct History {
    entries: VecDeque<ReportEntry>,
    errors: u64,
}

/// Bounded in-memory history; the oldest entries are dropped first.
#[derive(Debug)]
pub struct MemoryReporter {
    capacity: usize,
    history: Mutex<History>,
}

impl Default for MemoryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), history: Mutex::new(History::default()) }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.history.lock().entries.iter().cloned().collect()
    }

    /// Errors reported since creation, including ones no longer retained.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.history.lock().errors
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, level: ReportLevel, message: &str, context: Value) {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string());
        let mut history = self.history.lock();
        if level == ReportLevel::Error {
            history.errors += 1;
        }
        if history.entries.len() == self.capacity {
            history.entries.pop_front();
        }
        history.entries.push_back(ReportEntry {
            timestamp,
            level,
            message: message.to_string(),
            context,
        });
    }
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, level: ReportLevel, message: &str, context: Value) {
        (**self).report(level, message, context);
    }
}

/// Sends every report to both sinks.
pub struct Tee<A, B>(pub A, pub B);

impl<A: Reporter, B: Reporter> Reporter for Tee<A, B> {
    fn report(&self, level: ReportLevel, message: &str, context: Value) {
        self.0.report(level, message, context.clone());
        self.1.report(level, message, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_reporter_keeps_timestamped_entries() {
        let reporter = MemoryReporter::new();
        reporter.report(ReportLevel::Info, "search fired", json!({"query": "rize"}));
        reporter.report(ReportLevel::Error, "remote failed", json!({"status": 503}));

        let entries = reporter.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "search fired");
        assert_eq!(entries[1].context["status"], 503);
        assert!(OffsetDateTime::parse(&entries[0].timestamp, &Rfc3339).is_ok());
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn history_is_bounded_but_error_count_is_not() {
        let reporter = MemoryReporter::with_capacity(2);
        for index in 0..5 {
            reporter.report(ReportLevel::Error, &format!("failure {index}"), Value::Null);
        }
        let entries = reporter.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "failure 3");
        assert_eq!(reporter.error_count(), 5);
    }

    #[test]
    fn tee_reaches_both_sinks() {
        let tee = Tee(MemoryReporter::new(), MemoryReporter::new());
        tee.report(ReportLevel::Warning, "degraded", Value::Null);
        assert_eq!(tee.0.entries().len(), 1);
        assert_eq!(tee.1.entries().len(), 1);
    }

    #[test]
    fn shared_history_sees_reports_through_tee() {
        let history = Arc::new(MemoryReporter::new());
        let tee = Tee(TracingReporter, Arc::clone(&history));
        tee.report(ReportLevel::Error, "species missing", json!({"id": "TR-404"}));
        assert_eq!(history.error_count(), 1);
        assert_eq!(history.entries()[0].context["id"], "TR-404");
    }

    #[test]
    fn null_context_is_omitted() {
        let reporter = MemoryReporter::new();
        reporter.report(ReportLevel::Debug, "noop", Value::Null);
        let Ok(json) = serde_json::to_string(&reporter.entries()[0]) else {
            panic!("entry should serialize");
        };
        assert!(!json.contains("context"));
        assert!(json.contains("\"level\":\"debug\""));
    }
}
