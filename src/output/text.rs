//! Plain text reporter.
//!
//! Each duplicate group is written as soon as it is received: one path per
//! line, followed by an empty line.
//!
//! ```text
//! /photos/a.jpg
//! /backup/a.jpg
//!
//! /docs/report.pdf
//! /docs/old/report.pdf
//! /tmp/report.pdf
//!
//! ```

use std::io::Write;

use super::{Report, ReportError, ReportTotals};
use crate::duplicates::{HashGroup, ScanSummary};

/// Streams duplicate groups as plain text.
#[derive(Debug)]
pub struct TextReport<W: Write> {
    writer: W,
    totals: ReportTotals,
}

impl<W: Write> TextReport<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            totals: ReportTotals::default(),
        }
    }

    /// Consume the reporter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Report for TextReport<W> {
    fn add(&mut self, group: &HashGroup) -> Result<(), ReportError> {
        if !self.totals.record(group) {
            return Ok(());
        }

        for file in &group.files {
            writeln!(self.writer, "{}", file.path.display())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> Result<ReportTotals, ReportError> {
        self.writer.flush()?;
        Ok(self.totals)
    }

    fn totals(&self) -> ReportTotals {
        self.totals
    }
}
