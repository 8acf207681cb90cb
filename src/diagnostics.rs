//! Diagnostics sink: where signalled failures go.
//!
//! Components never format or print errors themselves. They hand an
//! [`ErrorCode`] and a context string to a [`Diagnostics`] gate, which forwards
//! to the configured [`DiagnosticSink`] only when debugging is enabled.

use crate::error::{ErrorCode, TranslatorError};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::error;

/// Receiver of failure reports.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, code: ErrorCode, context: &str);
}

/// Sink that logs every report through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, code: ErrorCode, context: &str) {
        error!(code = code.as_str(), "{}", context);
    }
}

/// Sink that keeps reports in memory, for hosts that want to inspect them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(ErrorCode, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far, in order.
    pub fn reports(&self) -> Vec<(ErrorCode, String)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Report codes only, in order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.reports().into_iter().map(|(code, _)| code).collect()
    }

    /// Number of reports with the given code.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.codes().into_iter().filter(|c| *c == code).count()
    }

    pub fn clear(&self) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, code: ErrorCode, context: &str) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((code, context.to_string()));
    }
}

/// Debug-gated handle to a sink.
///
/// With `debug` off, reports are dropped: not queued, not buffered.
#[derive(Clone)]
pub struct Diagnostics {
    enabled: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    pub fn new(enabled: bool, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { enabled, sink }
    }

    /// Gate that drops everything.
    pub fn disabled() -> Self {
        Self::new(false, Arc::new(TracingSink))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn report(&self, code: ErrorCode, context: &str) {
        if self.enabled {
            self.sink.report(code, context);
        }
    }

    pub fn report_error(&self, err: &TranslatorError) {
        self.report(err.code(), err.message());
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
