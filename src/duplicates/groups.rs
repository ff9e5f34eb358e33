//! Size groups, hash groups, and size-based file grouping.
//!
//! # Overview
//!
//! Size grouping is the first clustering stage. Files with different sizes
//! cannot be duplicates, so every file is bucketed by its exact byte size
//! before any content is read. The stage is a full barrier: a size group is
//! only final once the whole file sequence has been consumed.
//!
//! Grouping is policy-free. Groups with a single member and groups of
//! zero-byte files are kept; deciding what counts as a duplicate is left to
//! the consumer of [`HashGroup`]s.
//!
//! # Example
//!
//! ```
//! use finddup::scanner::FileRecord;
//! use finddup::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(groups.len(), 2);  // one group per distinct size
//! ```

use std::collections::HashMap;

use crate::scanner::{Digest, FileRecord};

/// A group of files with the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in discovery order
    pub files: Vec<FileRecord>,
}

impl SizeGroup {
    /// Create an empty size group.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Create a size group with initial files.
    #[must_use]
    pub fn with_files(size: u64, files: Vec<FileRecord>) -> Self {
        Self { size, files }
    }

    /// Add a file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match group size.
    pub fn add(&mut self, file: FileRecord) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match group size {}",
            file.size, self.size
        );
        self.files.push(file);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether the group could still contain duplicates (2+ files).
    #[must_use]
    pub fn has_peers(&self) -> bool {
        self.files.len() > 1
    }
}

/// Files sharing both size and content digest.
///
/// Members are treated as content-identical; a digest collision is taken
/// as identity and no byte-for-byte comparison is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashGroup {
    /// BLAKE3 digest shared by every member
    pub hash: Digest,
    /// File size in bytes shared by every member
    pub size: u64,
    /// Member files, each with `content_hash == Some(hash)`
    pub files: Vec<FileRecord>,
}

impl HashGroup {
    #[must_use]
    pub fn new(hash: Digest, size: u64, files: Vec<FileRecord>) -> Self {
        Self { hash, size, files }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True if the group holds at least two identical files.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.files.len() > 1
    }

    /// Bytes reclaimable by keeping one copy: `(members - 1) * size`.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.duplicate_count() as u64 * self.size
    }

    /// Number of redundant copies (members minus one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Paths of the member files.
    #[must_use]
    pub fn paths(&self) -> Vec<std::path::PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the size grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes (= number of groups emitted)
    pub unique_sizes: usize,
    /// Number of sizes seen exactly once
    pub singleton_sizes: usize,
    /// Number of zero-byte files
    pub empty_files: usize,
}

impl GroupingStats {
    /// Files that share their size with at least one other file.
    #[must_use]
    pub fn files_with_peers(&self) -> usize {
        self.total_files - self.singleton_sizes
    }
}

/// Group files by exact size.
///
/// Consumes the whole sequence before returning, so it may be fed directly
/// from a channel receiver; the call blocks until the sender side closes.
/// One [`SizeGroup`] is returned per distinct size, singletons and
/// zero-byte files included. The order of groups is unspecified.
///
/// # Example
///
/// ```
/// use finddup::scanner::FileRecord;
/// use finddup::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(stats.singleton_sizes, 1);  // The 200-byte file
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileRecord>,
) -> (Vec<SizeGroup>, GroupingStats) {
    let mut by_size: HashMap<u64, SizeGroup> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }

        by_size
            .entry(file.size)
            .or_insert_with(|| SizeGroup::new(file.size))
            .add(file);
    }

    stats.unique_sizes = by_size.len();
    stats.singleton_sizes = by_size.values().filter(|g| !g.has_peers()).count();

    log::info!(
        "Size grouping complete: {} files in {} distinct sizes ({} with peers)",
        stats.total_files,
        stats.unique_sizes,
        stats.files_with_peers()
    );

    (by_size.into_values().collect(), stats)
}
