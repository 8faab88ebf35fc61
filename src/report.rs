//! Report emitter: one tab-separated line per final group.
//!
//! Field order is fixed: inode, permissions, owner, group, size in bytes,
//! human-readable size, modification time, representative path, and the
//! group's remaining copies joined by `|` (empty for singletons). No header
//! row is printed.
//!
//! Metadata is probed on the representative only. If that probe fails the
//! whole group is skipped with a warning, which means duplicates of an
//! unreadable file go unreported.

use std::io::{self, Write};

use crate::identity::{AccountDatabase, SystemAccounts};
use crate::metadata::MetadataExtractor;
use crate::pipeline::FileGroup;

/// Counters from one report pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Groups written to the output.
    pub emitted: usize,
    /// Groups skipped because their representative could not be probed.
    pub skipped: usize,
}

/// Writes final groups as tab-separated records.
pub struct Reporter<'a, D = SystemAccounts> {
    extractor: &'a MetadataExtractor<'a, D>,
}

impl<'a, D: AccountDatabase> Reporter<'a, D> {
    /// Create a reporter that pulls metadata through `extractor`.
    #[must_use]
    pub fn new(extractor: &'a MetadataExtractor<'a, D>) -> Self {
        Self { extractor }
    }

    /// Emit one line per group, in the order given.
    ///
    /// # Errors
    ///
    /// Fails only when the output itself cannot be written; unreadable
    /// representatives are warned about and counted, not propagated.
    pub fn emit<W: Write>(&self, groups: &[FileGroup], out: &mut W) -> io::Result<ReportStats> {
        let mut stats = ReportStats::default();

        for group in groups {
            let meta = match self.extractor.extract(&group.representative) {
                Ok(meta) => meta,
                Err(err) => {
                    log::warn!("{err}");
                    stats.skipped += 1;
                    continue;
                }
            };

            let duplicates = group
                .duplicates
                .iter()
                .map(|p| p.to_string_lossy())
                .collect::<Vec<_>>()
                .join("|");

            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                meta.inode,
                meta.permissions,
                meta.owner,
                meta.group,
                meta.size,
                meta.readable_size,
                meta.modified,
                group.representative.display(),
                duplicates
            )?;
            stats.emitted += 1;
        }

        Ok(stats)
    }
}
