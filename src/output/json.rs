//! JSON reporter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//! Groups are collected as they arrive and written as one document once
//! the scan has finished.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "q1b2...=",
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "distinct_sizes": 80,
//!     "files_hashed": 100,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "errors": 0,
//!     "scan_duration_ms": 1234
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::{Report, ReportError, ReportTotals};
use crate::duplicates::{HashGroup, ScanSummary};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 digest as standard base64 (44 characters)
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Paths of all member files, as found during traversal
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    #[must_use]
    pub fn from_hash_group(group: &HashGroup) -> Self {
        Self {
            hash: group.hash.to_base64(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of regular files discovered
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub distinct_sizes: usize,
    /// Number of files hashed
    pub files_hashed: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one copy per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Directories and files that could not be read
    pub errors: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
}

impl JsonSummary {
    #[must_use]
    pub fn new(summary: &ScanSummary, totals: &ReportTotals) -> Self {
        Self {
            total_files: summary.files_discovered,
            total_size: summary.bytes_discovered,
            distinct_sizes: summary.distinct_sizes,
            files_hashed: summary.files_hashed,
            duplicate_groups: totals.duplicate_groups,
            duplicate_files: totals.duplicate_files,
            reclaimable_space: totals.wasted_space,
            errors: summary.error_count(),
            scan_duration_ms: summary.duration.as_millis() as u64,
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Collects duplicate groups and writes one JSON document on finish.
#[derive(Debug)]
pub struct JsonReport<W: Write> {
    writer: W,
    pretty: bool,
    duplicates: Vec<JsonDuplicateGroup>,
    totals: ReportTotals,
}

impl<W: Write> JsonReport<W> {
    /// Create a reporter writing pretty-printed JSON.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
            duplicates: Vec::new(),
            totals: ReportTotals::default(),
        }
    }

    /// Write compact single-line JSON instead.
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Consume the reporter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Report for JsonReport<W> {
    fn add(&mut self, group: &HashGroup) -> Result<(), ReportError> {
        if self.totals.record(group) {
            self.duplicates.push(JsonDuplicateGroup::from_hash_group(group));
        }
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> Result<ReportTotals, ReportError> {
        let output = JsonOutput {
            duplicates: std::mem::take(&mut self.duplicates),
            summary: JsonSummary::new(summary, &self.totals),
        };

        let json = if self.pretty {
            output.to_json_pretty()?
        } else {
            output.to_json()?
        };
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        Ok(self.totals)
    }

    fn totals(&self) -> ReportTotals {
        self.totals
    }
}
