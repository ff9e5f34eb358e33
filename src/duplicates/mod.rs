//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping
//! - Content-hash grouping within each size group
//! - The concurrent walk/size/hash pipeline

pub mod finder;
pub mod groups;
pub mod pipeline;

pub use finder::{HashConfig, HashGrouper, HashStats};
pub use groups::{group_by_size, GroupingStats, HashGroup, SizeGroup};
pub use pipeline::{
    DuplicateFinder, FinderConfig, FinderError, ScanHandle, ScanSummary, WalkStats,
    DEFAULT_CHANNEL_CAPACITY,
};
