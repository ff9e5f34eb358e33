//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Traverser`] struct for lazily walking one or
//! more directory trees and yielding every regular file as a
//! [`FileRecord`]. Traversal uses [`walkdir`], which keeps its own explicit
//! stack, so arbitrarily deep trees are walked without recursion limits.
//!
//! # Features
//!
//! - Multiple roots, walked in the order given
//! - Overlapping roots (equal or nested) are collapsed before walking
//! - Symlinks skipped by default; optional following with loop detection
//! - Unreadable directories are yielded as errors and skipped, never fatal
//!
//! # Example
//!
//! ```no_run
//! use finddup::scanner::{Traverser, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/home/user/Downloads"), PathBuf::from("/tmp")];
//! let traverser = Traverser::new(roots, WalkerConfig::default());
//! let files: Vec<_> = traverser.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Multi-root directory walker for file discovery.
#[derive(Debug)]
pub struct Traverser {
    /// Roots to walk, after overlap removal
    roots: Vec<PathBuf>,
    /// Walker configuration
    config: WalkerConfig,
}

impl Traverser {
    /// Create a traverser for the given roots.
    ///
    /// Roots equal to or nested inside another root are dropped, see
    /// [`dedup_roots`].
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            roots: dedup_roots(roots),
            config,
        }
    }

    /// Roots that will actually be walked.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Walk every root, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; the failing directory's subtree is skipped and the walk
    /// continues with its siblings and the remaining roots.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use finddup::scanner::{Traverser, WalkerConfig};
    /// use std::path::PathBuf;
    ///
    /// let traverser = Traverser::new(vec![PathBuf::from(".")], WalkerConfig::default());
    /// for result in traverser.walk() {
    ///     if let Err(e) = result {
    ///         eprintln!("{}", e);
    ///     }
    /// }
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        self.roots.iter().flat_map(move |root| self.walk_root(root))
    }

    fn walk_root<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = Result<FileRecord, ScanError>> + 'a {
        log::debug!("Walking root: {}", root.display());

        WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(root, entry),
                Err(e) => Some(Err(self.handle_walk_error(root, e))),
            })
    }

    /// Turn a directory entry into a record, or skip it.
    fn process_entry(
        &self,
        root: &Path,
        entry: DirEntry,
    ) -> Option<Result<FileRecord, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            log::trace!("Entering directory: {}", entry.path().display());
            return None;
        }

        // A root must be a directory
        if entry.depth() == 0 {
            return Some(Err(ScanError::Directory {
                path: root.to_path_buf(),
                source: io::Error::new(ErrorKind::NotADirectory, "not a directory"),
            }));
        }

        // Only reachable when links are not followed
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let path = entry.path().to_path_buf();
                log::debug!("Metadata failed for {}: {}", path.display(), e);
                let message = e.to_string();
                let source = e.into_io_error().unwrap_or_else(|| io::Error::other(message));
                return Some(Err(ScanError::Metadata { path, source }));
            }
        };

        let size = metadata.len();
        log::trace!("Found file ({} bytes): {}", size, entry.path().display());
        Some(Ok(FileRecord::new(entry.into_path(), size)))
    }

    /// Convert a walkdir error into a scan error.
    ///
    /// Roots, symlink loops and entries that are directories become
    /// [`ScanError::Directory`]. Anything else, such as a dangling symlink
    /// reached while following links, is a [`ScanError::Metadata`] on that
    /// entry.
    fn handle_walk_error(&self, root: &Path, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

        let is_loop = if let Some(ancestor) = error.loop_ancestor() {
            log::debug!(
                "Symlink loop at {} (back to {})",
                path.display(),
                ancestor.display()
            );
            true
        } else {
            log::debug!("Walker error for {}: {}", path.display(), error);
            false
        };
        let is_directory = error.depth() == 0 || is_loop || path.is_dir();

        // Keep the OS cause only, walkdir's own message repeats the path
        let message = error.to_string();
        let source = error
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message));

        if is_directory {
            ScanError::Directory { path, source }
        } else {
            ScanError::Metadata { path, source }
        }
    }
}

/// Drop roots that are equal to, or nested inside, another root.
///
/// Comparison uses canonical paths; the original spelling of each kept
/// root is preserved. Roots that cannot be canonicalized (missing,
/// unreadable) are kept so that walking them reports the error. For equal
/// roots the first occurrence wins.
#[must_use]
pub fn dedup_roots(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let canonical: Vec<Option<PathBuf>> = roots
        .iter()
        .map(|root| std::fs::canonicalize(root).ok())
        .collect();

    let mut kept = Vec::with_capacity(roots.len());

    for (i, root) in roots.into_iter().enumerate() {
        let covered = canonical[i].as_ref().is_some_and(|ci| {
            canonical.iter().enumerate().any(|(j, cj)| {
                j != i
                    && cj
                        .as_ref()
                        .is_some_and(|cj| (ci != cj && ci.starts_with(cj)) || (ci == cj && j < i))
            })
        });

        if covered {
            log::info!(
                "Skipping root {} (already covered by another root)",
                root.display()
            );
        } else {
            kept.push(root);
        }
    }

    kept
}
