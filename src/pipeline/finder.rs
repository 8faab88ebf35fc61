//! Pipeline orchestrator: traversal plus the three grouping stages.

use std::path::Path;
use std::time::Duration;

use crate::scanner::{Hasher, ScanError, Walker};

use super::{group_by_full_hash, group_by_partial_hash, group_by_size, FileGroup};

/// Configuration for the duplicate finder.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Confirm duplicates with a full-content hash. When disabled the scan
    /// stops after the partial-hash stage and reports same-prefix groups as
    /// duplicates: faster, but only an approximation.
    pub full_hash: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self { full_hash: true }
    }
}

impl FinderConfig {
    /// Set whether the full-content hashing stage runs.
    #[must_use]
    pub fn with_full_hash(mut self, full_hash: bool) -> Self {
        self.full_hash = full_hash;
        self
    }
}

/// Summary statistics from one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files yielded by traversal.
    pub total_files: usize,
    /// Files finalized as unique by the size stage alone.
    pub eliminated_by_size: usize,
    /// Files finalized as unique by the partial-hash stage.
    pub eliminated_by_partial_hash: usize,
    /// Final groups holding 2+ byte-identical files.
    pub duplicate_groups: usize,
    /// Duplicate copies across all groups (originals not counted).
    pub duplicate_files: usize,
    /// Per-file warnings emitted (traversal, stat, and hash failures).
    pub warnings: usize,
    /// Wall-clock duration of the scan.
    pub scan_duration: Duration,
}

/// Orchestrates the full duplicate-detection funnel over one directory tree.
///
/// # Example
///
/// ```no_run
/// use dupels::pipeline::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default());
/// let (groups, summary) = finder.find_duplicates(Path::new("/some/tree")).unwrap();
/// for group in groups.iter().filter(|g| !g.is_singleton()) {
///     println!("{} has {} copies", group.representative.display(), group.duplicates.len());
/// }
/// println!("{} warnings", summary.warnings);
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan `root` and return every final group plus summary statistics.
    ///
    /// Groups come back sorted by the representative's traversal order, so
    /// repeated runs over an unchanged tree produce identical output. Every
    /// traversed file lands in exactly one group unless a per-file failure
    /// excluded it (counted in [`ScanSummary::warnings`]).
    ///
    /// # Errors
    ///
    /// Only a missing or non-directory root fails the whole scan; all other
    /// failures are logged per file and skipped.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<FileGroup>, ScanSummary), ScanError> {
        log::info!("scanning {}", root.display());

        let walker = Walker::new(root);
        let mut walk_warnings = 0usize;
        let mut paths = Vec::new();
        for item in walker.walk()? {
            match item {
                Ok(path) => paths.push(path),
                Err(err) => {
                    log::warn!("{err}");
                    walk_warnings += 1;
                }
            }
        }

        let (groups, mut summary) = self.find_duplicates_from_paths(paths);
        summary.warnings += walk_warnings;

        log::info!(
            "found {} duplicate files in {} groups among {} files ({:?})",
            summary.duplicate_files,
            summary.duplicate_groups,
            summary.total_files,
            summary.scan_duration
        );

        Ok((groups, summary))
    }

    /// Run the funnel over an already-collected candidate list.
    ///
    /// Useful when paths come from somewhere other than the built-in
    /// walker. Sequence numbers are assigned in iteration order.
    pub fn find_duplicates_from_paths(
        &self,
        paths: Vec<std::path::PathBuf>,
    ) -> (Vec<FileGroup>, ScanSummary) {
        let start = std::time::Instant::now();
        let mut summary = ScanSummary {
            total_files: paths.len(),
            ..Default::default()
        };

        let (mut groups, buckets, size_stats) = group_by_size(paths);
        summary.eliminated_by_size = size_stats.singletons;
        summary.warnings += size_stats.failed_files;

        let (partial_finals, buckets, partial_stats) =
            group_by_partial_hash(buckets, &self.hasher);
        groups.extend(partial_finals);
        summary.eliminated_by_partial_hash = partial_stats.singletons;
        summary.warnings += partial_stats.failed_files;

        if self.config.full_hash {
            let (full_finals, full_stats) = group_by_full_hash(buckets, &self.hasher);
            groups.extend(full_finals);
            summary.warnings += full_stats.failed_files;
        } else {
            groups.extend(buckets.into_iter().map(FileGroup::from_members));
        }

        groups.sort_by_key(|g| g.seq);
        summary.duplicate_groups = groups.iter().filter(|g| !g.is_singleton()).count();
        summary.duplicate_files = groups.iter().map(|g| g.duplicates.len()).sum();
        summary.scan_duration = start.elapsed();

        (groups, summary)
    }
}
