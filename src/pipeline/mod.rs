//! Duplicate detection pipeline: a three-stage equality funnel.
//!
//! # Overview
//!
//! Files are grouped by successively stronger equality proxies, each stage
//! only paying its cost for files the previous stage could not rule out:
//!
//! 1. **Size bucketing** ([`stages::group_by_size`]) - free metadata, no I/O
//! 2. **Partial hashing** ([`stages::group_by_partial_hash`]) - first 64 KiB
//! 3. **Full hashing** ([`stages::group_by_full_hash`]) - whole-file digest
//!
//! A bucket that shrinks to one member at any stage is final immediately:
//! that file is unique and costs nothing further. Buckets surviving the
//! full-hash stage are confirmed duplicate sets (up to BLAKE3 collision
//! odds, which are negligible for real corpora).
//!
//! Each stage is an independent grouping pass over materialized candidate
//! lists rather than one fused loop, so every stage can be tested on its
//! own and the funnel's correctness stays easy to see.
//!
//! [`DuplicateFinder`] in [`finder`] wires the stages to the walker and is
//! the entry point most callers want.

pub mod finder;
pub mod stages;

use std::path::PathBuf;

pub use finder::{DuplicateFinder, FinderConfig, ScanSummary};
pub use stages::{group_by_full_hash, group_by_partial_hash, group_by_size};

/// A file moving through the funnel.
///
/// `seq` is the traversal-assigned sequence number; it fixes encounter
/// order once so later stages (or a parallel re-implementation of them)
/// can restore it deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position in traversal order, starting at 0.
    pub seq: usize,
    /// Absolute path of the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

/// A final output group: one representative plus its byte-identical copies.
///
/// Singletons have an empty `duplicates` list. The representative is always
/// the first-encountered member of the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Sequence number of the representative (used for output ordering).
    pub seq: usize,
    /// Shared size of every member, in bytes.
    pub size: u64,
    /// First-encountered member; the row the report prints metadata for.
    pub representative: PathBuf,
    /// Remaining members in encounter order.
    pub duplicates: Vec<PathBuf>,
}

impl FileGroup {
    /// Build a group from a bucket of candidates.
    ///
    /// Members are ordered by sequence number first, so the representative
    /// is the earliest-encountered file no matter how the bucket was
    /// assembled.
    ///
    /// # Panics
    ///
    /// Panics if `members` is empty; buckets always hold at least one file.
    #[must_use]
    pub fn from_members(mut members: Vec<Candidate>) -> Self {
        assert!(!members.is_empty(), "bucket cannot be empty");
        members.sort_by_key(|c| c.seq);

        let mut iter = members.into_iter();
        let first = iter.next().expect("checked non-empty above");
        Self {
            seq: first.seq,
            size: first.size,
            representative: first.path,
            duplicates: iter.map(|c| c.path).collect(),
        }
    }

    /// Total number of files in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.duplicates.len()
    }

    /// A group can never be empty; provided for iterator-adapter symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this group holds exactly one file.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Statistics from the size-bucketing stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Files that entered the stage.
    pub input_files: usize,
    /// Files dropped because their size could not be read.
    pub failed_files: usize,
    /// Buckets finalized with a single member.
    pub singletons: usize,
    /// Files forwarded to the next stage.
    pub candidate_files: usize,
    /// Buckets (2+ members) forwarded to the next stage.
    pub candidate_groups: usize,
}

/// Statistics from a hashing stage (partial or full).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Files that entered the stage.
    pub input_files: usize,
    /// Files successfully hashed.
    pub hashed_files: usize,
    /// Files dropped due to read errors.
    pub failed_files: usize,
    /// Buckets finalized with a single member.
    pub singletons: usize,
    /// Files forwarded to the next stage (zero for the final stage).
    pub candidate_files: usize,
    /// Buckets forwarded to the next stage (zero for the final stage).
    pub candidate_groups: usize,
}
