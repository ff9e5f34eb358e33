//! finddup - Duplicate File Finder
//!
//! Finds regular files with identical content under one or more directory
//! trees. Files are streamed from a lazy directory walk, grouped by exact
//! size, and then grouped by BLAKE3 content digest. The three stages run
//! concurrently on their own threads, joined by bounded channels.

pub mod cli;
pub mod diagnostics;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;

use cli::{Cli, OutputFormat};
use diagnostics::StderrDiagnostics;
use duplicates::{DuplicateFinder, FinderConfig, ScanHandle, ScanSummary};
use error::ExitCode;
use output::{write_summary_line, JsonReport, Report, ReportTotals, TextReport};

/// Run a scan as described by the parsed command line.
///
/// Duplicate groups go to stdout, diagnostics and the
/// `duplicated size: <N> B` line go to stderr. Unreadable directories and
/// files do not make the run fail.
///
/// # Errors
///
/// Returns an error if a worker thread fails or the report cannot be
/// written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = FinderConfig::default()
        .with_io_threads(cli.io_threads)
        .with_follow_symlinks(cli.follow_symlinks);
    log::debug!("Finder configuration: {:?}", config);

    let diagnostics = Arc::new(StderrDiagnostics::new());
    let finder = DuplicateFinder::new(config);
    let handle = finder
        .spawn(cli.dirs, diagnostics.clone())
        .context("Failed to start scan")?;

    let mut report: Box<dyn Report> = match cli.output {
        OutputFormat::Text => Box::new(TextReport::new(io::stdout().lock())),
        OutputFormat::Json => Box::new(JsonReport::new(io::stdout().lock())),
    };

    stream_report(handle, report.as_mut(), &mut io::stderr().lock())?;

    if diagnostics.count() > 0 {
        log::info!(
            "{} path(s) could not be read and were skipped",
            diagnostics.count()
        );
    }

    Ok(ExitCode::Success)
}

/// Feed every group of a running scan into `report`, then write the
/// `duplicated size: <N> B` line to `summary_out`.
///
/// The summary line is written even if the report or the scan fails. It
/// then covers the groups received before the failure, and the failure is
/// returned afterwards.
///
/// # Errors
///
/// Returns an error if a worker thread fails, the report cannot be written
/// or the summary line cannot be written.
pub fn stream_report<W: Write>(
    handle: ScanHandle,
    report: &mut dyn Report,
    summary_out: &mut W,
) -> anyhow::Result<ScanSummary> {
    let streamed = write_groups(handle, report);
    let totals = match &streamed {
        Ok((_, totals)) => *totals,
        Err(_) => report.totals(),
    };

    write_summary_line(summary_out, &totals).context("Failed to write summary")?;
    streamed.map(|(summary, _)| summary)
}

fn write_groups(
    handle: ScanHandle,
    report: &mut dyn Report,
) -> anyhow::Result<(ScanSummary, ReportTotals)> {
    for group in handle.groups() {
        report.add(&group).context("Failed to write duplicate group")?;
    }

    let summary = handle.finish().context("Scan failed")?;
    let totals = report.finish(&summary).context("Failed to write report")?;
    Ok((summary, totals))
}
