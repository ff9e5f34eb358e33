//! Command-line interface definitions for finddup.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under two directories
//! finddup ~/Pictures /mnt/backup/Pictures
//!
//! # JSON output for scripting
//! finddup ~/Downloads --output json
//!
//! # Verbose mode for debugging
//! finddup -vv ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find files with identical content.
///
/// Every regular file under the given directories is grouped by size and
/// then by BLAKE3 content digest. Each set of identical files is printed as
/// one path per line followed by an empty line. The total size that could
/// be reclaimed is printed to stderr.
#[derive(Debug, Parser)]
#[command(name = "finddup")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "finddup <directory> [<directory> ...]")]
pub struct Cli {
    /// Directories to scan
    #[arg(value_name = "DIRECTORY", required = true, num_args = 1..)]
    pub dirs: Vec<PathBuf>,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Follow symbolic links during the scan
    ///
    /// Symlink loops are detected and reported instead of followed.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Number of threads hashing files of the same size (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", default_value = "4", value_parser = parse_thread_count)]
    pub io_threads: usize,

    /// Output format for duplicate groups
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One path per line, blank line after each group
    Text,
    /// Single JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a thread count, rejecting zero.
///
/// # Errors
///
/// Returns an error if the value is not a positive integer.
pub fn parse_thread_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid thread count: '{s}'"))?;
    if n == 0 {
        return Err("Thread count must be at least 1".to_string());
    }
    Ok(n)
}
