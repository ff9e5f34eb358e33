//! Side channel for non-fatal scan errors.
//!
//! Pipeline stages never fail because of a single unreadable directory or
//! file. Instead they hand the error to a [`DiagnosticSink`] and move on.
//! The binary uses [`StderrDiagnostics`], which prints one line per error;
//! tests and library users can use [`CollectingDiagnostics`].

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::scanner::ScanError;

/// Receiver of non-fatal scan errors.
///
/// Implementations are called from worker threads and must be cheap;
/// a slow sink stalls the stage that reported the error.
pub trait DiagnosticSink: Send + Sync {
    /// Called once for each directory or file that had to be skipped.
    fn report(&self, error: &ScanError);
}

/// Prints each error as a single line on standard error.
///
/// Line formats:
/// - `error reading directory '<path>': <cause>`
/// - `error reading file '<path>': <cause>`
/// - `can not hash file '<path>': <cause>`
#[derive(Debug, Default)]
pub struct StderrDiagnostics {
    count: AtomicUsize,
}

impl StderrDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of errors printed so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for StderrDiagnostics {
    fn report(&self, error: &ScanError) {
        self.count.fetch_add(1, Ordering::Relaxed);
        log::debug!("Reporting scan error: {:?}", error);

        let mut stderr = std::io::stderr().lock();
        // Nothing sensible to do if stderr itself is gone
        let _ = writeln!(stderr, "{}", error);
    }
}

/// Keeps reported errors in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    errors: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered messages of every error reported so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    /// Number of errors reported so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.lock().map(|errors| errors.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, error: &ScanError) {
        log::debug!("Collecting scan error: {:?}", error);
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error.to_string());
        }
    }
}

/// Discards every error.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn report(&self, _error: &ScanError) {}
}
