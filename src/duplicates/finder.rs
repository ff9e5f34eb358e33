//! Content-hash grouping within size groups.
//!
//! # Overview
//!
//! [`HashGrouper`] takes one [`SizeGroup`] at a time, computes the BLAKE3
//! digest of every member, and partitions the members into [`HashGroup`]s
//! of identical digest. Every member is hashed, including the only member
//! of a singleton group, so each emitted group carries a digest.
//!
//! A file that cannot be opened or read is reported to the
//! [`DiagnosticSink`] and left out; the rest of its size group is still
//! grouped.
//!
//! # Example
//!
//! ```no_run
//! use finddup::diagnostics::StderrDiagnostics;
//! use finddup::duplicates::{group_by_size, HashConfig, HashGrouper};
//! use finddup::scanner::{Traverser, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let traverser = Traverser::new(vec![PathBuf::from(".")], WalkerConfig::default());
//! let (size_groups, _) = group_by_size(traverser.walk().filter_map(Result::ok));
//!
//! let grouper = HashGrouper::new(HashConfig::default());
//! let diagnostics = StderrDiagnostics::new();
//! for size_group in size_groups {
//!     let (hash_groups, _) = grouper.group(size_group, &diagnostics);
//!     for group in hash_groups.iter().filter(|g| g.is_duplicate()) {
//!         println!("{} copies of {} bytes", group.len(), group.size);
//!     }
//! }
//! ```

use std::collections::HashMap;

use rayon::prelude::*;

use super::groups::{HashGroup, SizeGroup};
use crate::diagnostics::DiagnosticSink;
use crate::scanner::{Digest, FileRecord, HashError, Hasher, ScanError};

/// Files above this size are logged individually at debug level.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Configuration for the hash stage.
#[derive(Debug, Clone)]
pub struct HashConfig {
    /// Number of I/O threads hashing members of one size group.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Read buffer size for streaming file content.
    pub buffer_size: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            buffer_size: crate::scanner::BUFFER_SIZE,
        }
    }
}

impl HashConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}

/// Statistics from the hash stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Size groups received
    pub size_groups: usize,
    /// Files received
    pub input_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be hashed
    pub failed_files: usize,
    /// Bytes hashed (traversal-time sizes of hashed files)
    pub bytes_hashed: u64,
    /// Hash groups produced
    pub hash_groups: usize,
}

impl HashStats {
    /// Fold another set of statistics into this one.
    pub fn merge(&mut self, other: &HashStats) {
        self.size_groups += other.size_groups;
        self.input_files += other.input_files;
        self.hashed_files += other.hashed_files;
        self.failed_files += other.failed_files;
        self.bytes_hashed += other.bytes_hashed;
        self.hash_groups += other.hash_groups;
    }
}

/// Splits size groups into groups of identical content.
#[derive(Debug)]
pub struct HashGrouper {
    hasher: Hasher,
    pool: Option<rayon::ThreadPool>,
    config: HashConfig,
}

impl HashGrouper {
    /// Create a grouper with its own bounded hashing pool.
    ///
    /// Zero thread or buffer counts are raised to one. If the pool cannot be
    /// built, members are hashed sequentially on the calling thread.
    #[must_use]
    pub fn new(config: HashConfig) -> Self {
        // rayon reads zero threads as one per CPU
        let (threads, buffer_size) = (config.io_threads, config.buffer_size);
        let config = config
            .with_io_threads(threads)
            .with_buffer_size(buffer_size);

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(config.io_threads)
            .thread_name(|i| format!("finddup-io-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!(
                    "Failed to create hashing thread pool, hashing sequentially: {}",
                    e
                );
                None
            }
        };

        Self {
            hasher: Hasher::with_buffer_size(config.buffer_size),
            pool,
            config,
        }
    }

    /// The configuration this grouper was built with.
    #[must_use]
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Hash every member of `group` and partition by digest.
    ///
    /// Returned groups keep the discovery order of their members, and are
    /// themselves ordered by first appearance in `group`. Files that fail
    /// to hash are reported to `diagnostics` and omitted.
    pub fn group(
        &self,
        group: SizeGroup,
        diagnostics: &dyn DiagnosticSink,
    ) -> (Vec<HashGroup>, HashStats) {
        let size = group.size;
        let mut stats = HashStats {
            size_groups: 1,
            input_files: group.files.len(),
            ..Default::default()
        };

        if group.files.is_empty() {
            return (Vec::new(), stats);
        }

        log::debug!(
            "Hashing size group of {} bytes ({} files)",
            size,
            group.files.len()
        );

        let results = self.hash_all(group.files);

        let mut index: HashMap<Digest, usize> = HashMap::new();
        let mut hash_groups: Vec<HashGroup> = Vec::new();

        for (file, result) in results {
            match result {
                Ok(digest) => {
                    stats.hashed_files += 1;
                    stats.bytes_hashed += file.size;

                    let record = file.with_hash(digest);
                    match index.get(&digest) {
                        Some(&i) => hash_groups[i].files.push(record),
                        None => {
                            index.insert(digest, hash_groups.len());
                            hash_groups.push(HashGroup::new(digest, size, vec![record]));
                        }
                    }
                }
                Err(e) => {
                    stats.failed_files += 1;
                    log::debug!("Excluding unhashable file: {}", e.path().display());
                    diagnostics.report(&ScanError::from(e));
                }
            }
        }

        stats.hash_groups = hash_groups.len();
        log::debug!(
            "Size group of {} bytes split into {} hash group(s)",
            size,
            hash_groups.len()
        );

        (hash_groups, stats)
    }

    /// Hash files on the pool, keeping input order.
    fn hash_all(&self, files: Vec<FileRecord>) -> Vec<(FileRecord, Result<Digest, HashError>)> {
        let hash_one = |file: FileRecord| {
            if file.size > LARGE_FILE_THRESHOLD {
                log::debug!(
                    "Hashing large file ({}): {}",
                    bytesize::ByteSize(file.size),
                    file.path.display()
                );
            }
            let result = self.hasher.full_hash(&file.path);
            log::trace!("Hashed {}: {}", file.path.display(), result.is_ok());
            (file, result)
        };

        match &self.pool {
            Some(pool) if files.len() > 1 => {
                pool.install(|| files.into_par_iter().map(hash_one).collect())
            }
            _ => files.into_iter().map(hash_one).collect(),
        }
    }
}
