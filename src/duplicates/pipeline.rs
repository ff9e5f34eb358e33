//! Concurrent scan pipeline.
//!
//! # Overview
//!
//! A scan runs as three named worker threads connected by bounded
//! crossbeam channels:
//!
//! ```text
//! finddup-walk ──FileRecord──▶ finddup-size ──SizeGroup──▶ finddup-hash ──HashGroup──▶ ScanHandle
//! ```
//!
//! - **walk** streams every regular file under the roots.
//! - **size** consumes the whole file stream, then emits one group per size.
//! - **hash** splits each size group by content digest as soon as it arrives
//!   and forwards each hash group immediately.
//!
//! A full channel blocks its producer. Each stage closes its output by
//! dropping the sender when its input is exhausted. If the consumer goes
//! away early, the failed sends make the workers stop without error.
//!
//! Non-fatal errors go to the [`DiagnosticSink`]; stage statistics come back
//! through the thread join handles.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};

use super::finder::{HashConfig, HashGrouper, HashStats};
use super::groups::{group_by_size, GroupingStats, HashGroup};
use crate::diagnostics::DiagnosticSink;
use crate::scanner::{Traverser, WalkerConfig};

/// Default capacity of each inter-stage channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Configuration for a full scan.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Traversal options
    pub walker: WalkerConfig,
    /// Hash stage options
    pub hash: HashConfig,
    /// Capacity of each bounded channel between stages
    pub channel_capacity: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker: WalkerConfig::default(),
            hash: HashConfig::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker = config;
        self
    }

    /// Set the hash stage configuration.
    #[must_use]
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash = config;
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.hash = self.hash.with_io_threads(threads);
        self
    }

    /// Follow symbolic links during traversal.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.walker = self.walker.with_follow_symlinks(follow);
        self
    }

    /// Set the inter-stage channel capacity (minimum 1).
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

/// Errors that end a scan.
///
/// Unreadable directories and files are never reported here; they go to
/// the [`DiagnosticSink`].
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// No root directory was given.
    #[error("No directories to scan")]
    NoRoots,

    /// A worker thread could not be started.
    #[error("Failed to start worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A worker thread panicked.
    #[error("The {0} stage terminated unexpectedly")]
    WorkerPanicked(&'static str),
}

/// Counters from the traversal stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Regular files sent downstream
    pub files: usize,
    /// Directories or entries that could not be read
    pub errors: usize,
}

/// Summary statistics from a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Regular files discovered by traversal
    pub files_discovered: usize,
    /// Total size of discovered files in bytes
    pub bytes_discovered: u64,
    /// Number of distinct file sizes
    pub distinct_sizes: usize,
    /// Files whose content was hashed
    pub files_hashed: usize,
    /// Files that could not be hashed
    pub hash_failures: usize,
    /// Bytes of content hashed
    pub bytes_hashed: u64,
    /// Directories or entries that could not be read
    pub traversal_errors: usize,
    /// Hash groups emitted, singletons included
    pub hash_groups: usize,
    /// Wall-clock duration of the scan
    pub duration: Duration,
}

impl ScanSummary {
    fn from_stages(walk: WalkStats, size: &GroupingStats, hash: &HashStats) -> Self {
        Self {
            files_discovered: size.total_files,
            bytes_discovered: size.total_size,
            distinct_sizes: size.unique_sizes,
            files_hashed: hash.hashed_files,
            hash_failures: hash.failed_files,
            bytes_hashed: hash.bytes_hashed,
            traversal_errors: walk.errors,
            hash_groups: hash.hash_groups,
            duration: Duration::ZERO,
        }
    }

    /// Total number of non-fatal errors reported during the scan.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.traversal_errors + self.hash_failures
    }

    /// Discovered size as a human-readable string.
    #[must_use]
    pub fn bytes_discovered_display(&self) -> String {
        bytesize::ByteSize(self.bytes_discovered).to_string()
    }
}

/// Handle to a running scan.
///
/// Iterate [`groups`](Self::groups) to receive hash groups as they are
/// produced, then call [`finish`](Self::finish) for the statistics.
/// Dropping the handle early stops the workers at their next send.
pub struct ScanHandle {
    groups: Receiver<HashGroup>,
    walk: JoinHandle<WalkStats>,
    size: JoinHandle<GroupingStats>,
    hash: JoinHandle<HashStats>,
    started: Instant,
}

impl ScanHandle {
    /// Blocking iterator over hash groups, singletons included.
    ///
    /// Ends once the hash stage has processed every size group.
    pub fn groups(&self) -> impl Iterator<Item = HashGroup> + '_ {
        self.groups.iter()
    }

    /// Wait for the scan to complete and collect its statistics.
    ///
    /// Groups not yet received are drained and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::WorkerPanicked`] naming the first stage whose
    /// thread panicked.
    pub fn finish(self) -> Result<ScanSummary, FinderError> {
        let drained = self.groups.iter().count();
        if drained > 0 {
            log::debug!("Discarded {} unconsumed hash groups", drained);
        }
        drop(self.groups);

        // Join every stage before reporting so no worker outlives the handle
        let walk = self.walk.join();
        let size = self.size.join();
        let hash = self.hash.join();

        let walk = walk.map_err(|_| FinderError::WorkerPanicked("walk"))?;
        let size = size.map_err(|_| FinderError::WorkerPanicked("size"))?;
        let hash = hash.map_err(|_| FinderError::WorkerPanicked("hash"))?;

        let mut summary = ScanSummary::from_stages(walk, &size, &hash);
        summary.duration = self.started.elapsed();

        log::info!(
            "Scan complete: {} files ({}), {} hash groups, {} errors in {:.2?}",
            summary.files_discovered,
            summary.bytes_discovered_display(),
            summary.hash_groups,
            summary.error_count(),
            summary.duration
        );

        Ok(summary)
    }
}

/// Runs the walk, size, and hash stages as a concurrent pipeline.
///
/// # Example
///
/// ```no_run
/// use finddup::diagnostics::StderrDiagnostics;
/// use finddup::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(2));
/// let handle = finder
///     .spawn(vec![PathBuf::from(".")], Arc::new(StderrDiagnostics::new()))
///     .unwrap();
///
/// for group in handle.groups().filter(|g| g.is_duplicate()) {
///     println!("{} copies of {} bytes", group.len(), group.size);
/// }
/// let summary = handle.finish().unwrap();
/// println!("Scanned {} files", summary.files_discovered);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Start a scan of `roots` on background threads.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NoRoots`] if `roots` is empty and
    /// [`FinderError::Spawn`] if a worker thread cannot be started.
    pub fn spawn(
        &self,
        roots: Vec<PathBuf>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<ScanHandle, FinderError> {
        if roots.is_empty() {
            return Err(FinderError::NoRoots);
        }

        let started = Instant::now();
        let capacity = self.config.channel_capacity.max(1);
        let (file_tx, file_rx) = bounded(capacity);
        let (size_tx, size_rx) = bounded(capacity);
        let (group_tx, group_rx) = bounded(capacity);

        let traverser = Traverser::new(roots, self.config.walker.clone());
        log::info!("Scanning {} root(s)", traverser.roots().len());

        let walk_diagnostics = Arc::clone(&diagnostics);
        let walk = thread::Builder::new()
            .name("finddup-walk".to_string())
            .spawn(move || {
                log::debug!("Walk stage started");
                let mut stats = WalkStats::default();
                for entry in traverser.walk() {
                    match entry {
                        Ok(file) => {
                            log::trace!("Found {} ({} bytes)", file.path.display(), file.size);
                            if file_tx.send(file).is_err() {
                                log::debug!("Size stage gone, stopping walk");
                                break;
                            }
                            stats.files += 1;
                        }
                        Err(e) => {
                            stats.errors += 1;
                            walk_diagnostics.report(&e);
                        }
                    }
                }
                log::info!(
                    "Walk stage finished: {} files, {} errors",
                    stats.files,
                    stats.errors
                );
                stats
            })
            .map_err(FinderError::Spawn)?;

        let size = thread::Builder::new()
            .name("finddup-size".to_string())
            .spawn(move || {
                log::debug!("Size stage started");
                let (groups, stats) = group_by_size(file_rx.iter());
                for group in groups {
                    if size_tx.send(group).is_err() {
                        log::debug!("Hash stage gone, stopping size stage");
                        break;
                    }
                }
                stats
            })
            .map_err(FinderError::Spawn)?;

        let hash_config = self.config.hash.clone();
        let hash = thread::Builder::new()
            .name("finddup-hash".to_string())
            .spawn(move || {
                log::debug!("Hash stage started");
                let grouper = HashGrouper::new(hash_config);
                let mut stats = HashStats::default();

                'groups: for size_group in size_rx.iter() {
                    let (groups, group_stats) = grouper.group(size_group, diagnostics.as_ref());
                    stats.merge(&group_stats);
                    for group in groups {
                        if group_tx.send(group).is_err() {
                            log::debug!("Consumer gone, stopping hash stage");
                            break 'groups;
                        }
                    }
                }

                log::info!(
                    "Hash stage finished: {} files hashed, {} failed",
                    stats.hashed_files,
                    stats.failed_files
                );
                stats
            })
            .map_err(FinderError::Spawn)?;

        Ok(ScanHandle {
            groups: group_rx,
            walk,
            size,
            hash,
            started,
        })
    }

    /// Scan `roots` and collect every hash group, singletons included.
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn) and [`ScanHandle::finish`].
    pub fn find_duplicates(
        &self,
        roots: Vec<PathBuf>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<(Vec<HashGroup>, ScanSummary), FinderError> {
        let handle = self.spawn(roots, diagnostics)?;
        let groups: Vec<HashGroup> = handle.groups().collect();
        let summary = handle.finish()?;
        Ok((groups, summary))
    }
}
