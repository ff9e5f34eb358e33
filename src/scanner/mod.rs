//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Lazy, multi-root directory walking using walkdir
//! - Content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use finddup::scanner::{Traverser, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let traverser = Traverser::new(vec![PathBuf::from(".")], WalkerConfig::default());
//! for entry in traverser.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Digest, Hasher, BUFFER_SIZE};
pub use walker::{dedup_roots, Traverser};

/// A regular file discovered during traversal.
///
/// The path is the record's identity within a scan. `content_hash` stays
/// `None` until the hash stage fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file, as reached from its scan root
    pub path: PathBuf,
    /// File size in bytes at traversal time
    pub size: u64,
    /// BLAKE3 digest of the content, once computed
    pub content_hash: Option<Digest>,
}

impl FileRecord {
    /// Create a record for a freshly discovered file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            content_hash: None,
        }
    }

    /// Return this record with its content digest set.
    #[must_use]
    pub fn with_hash(mut self, hash: Digest) -> Self {
        self.content_hash = Some(hash);
        self
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Loops back to an ancestor are reported as directory errors.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Set whether symbolic links are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Errors that can occur during scanning.
///
/// None of these stop a scan; they are reported through a
/// [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) and the affected
/// directory or file is skipped.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// A directory (or scan root) could not be opened or listed.
    #[error("error reading directory '{}': {source}", .path.display())]
    Directory {
        /// Directory that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A listed entry vanished or could not be stat'ed.
    #[error("error reading file '{}': {source}", .path.display())]
    Metadata {
        /// Entry that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory { path, .. } | Self::Metadata { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file could not be opened.
    #[error("can not hash file '{}': {source}", .path.display())]
    Open {
        /// File that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading the file failed part-way.
    #[error("can not hash file '{}': {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}
