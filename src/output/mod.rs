//! Reporters for duplicate scan results.
//!
//! Hash groups arrive from the pipeline with singletons included; every
//! reporter skips groups with fewer than two members.
//!
//! - [`text`]: one path per line, empty line after each group, streamed
//! - [`json`]: a single JSON document for scripting
//!
//! Both accumulate [`ReportTotals`]. The total wasted size is always
//! written to stderr by [`write_summary_line`], whatever the format.
//!
//! # Example
//!
//! ```no_run
//! use finddup::diagnostics::StderrDiagnostics;
//! use finddup::duplicates::DuplicateFinder;
//! use finddup::output::{write_summary_line, Report, TextReport};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let handle = finder
//!     .spawn(vec![PathBuf::from(".")], Arc::new(StderrDiagnostics::new()))
//!     .unwrap();
//!
//! let mut report = TextReport::new(std::io::stdout().lock());
//! for group in handle.groups() {
//!     report.add(&group).unwrap();
//! }
//! let summary = handle.finish().unwrap();
//! let totals = report.finish(&summary).unwrap();
//! write_summary_line(&mut std::io::stderr(), &totals).unwrap();
//! ```

pub mod json;
pub mod text;

use std::io::{self, Write};

use crate::duplicates::{HashGroup, ScanSummary};

// Re-export main types
pub use json::JsonReport;
pub use text::TextReport;

/// Running totals over the duplicate groups a reporter has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    /// Groups with at least two members
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (members minus one, summed)
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy of each group
    pub wasted_space: u64,
}

impl ReportTotals {
    /// Account for one group. Returns false for singletons, which are
    /// not counted.
    pub fn record(&mut self, group: &HashGroup) -> bool {
        if !group.is_duplicate() {
            return false;
        }
        self.duplicate_groups += 1;
        self.duplicate_files += group.duplicate_count();
        self.wasted_space += group.wasted_space();
        true
    }
}

/// Errors that can occur while writing a report.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// I/O error while writing
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A consumer of hash groups.
pub trait Report {
    /// Handle one hash group. Singletons are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn add(&mut self, group: &HashGroup) -> Result<(), ReportError>;

    /// Complete the report and return the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn finish(&mut self, summary: &ScanSummary) -> Result<ReportTotals, ReportError>;

    /// Totals over the groups received so far, including a group whose
    /// write failed.
    fn totals(&self) -> ReportTotals;
}

/// Write the `duplicated size: <N> B` line.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_summary_line<W: Write>(writer: &mut W, totals: &ReportTotals) -> io::Result<()> {
    writeln!(writer, "duplicated size: {} B", totals.wasted_space)
}
