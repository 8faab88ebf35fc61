//! dupels - Duplicate-Aware Recursive File Lister
//!
//! Walks a directory tree and prints one line of `ls`-style metadata per
//! unique file, flagging byte-identical copies. Duplicate detection uses a
//! three-stage funnel (size, partial BLAKE3 hash, full BLAKE3 hash) so that
//! full-file reads are only paid for genuine candidates.

use std::io::Write;

use crate::cli::Cli;
use crate::error::ExitCode;
use crate::identity::IdentityCache;
use crate::metadata::MetadataExtractor;
use crate::pipeline::{DuplicateFinder, FinderConfig};
use crate::report::Reporter;
use crate::scanner::path_utils;

pub mod cli;
pub mod error;
pub mod identity;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod scanner;

/// Run the scan described by the parsed CLI arguments and print the report
/// to standard output.
///
/// Returns the exit code the process should terminate with: `Success` when
/// the scan completed cleanly, `PartialSuccess` when any per-file warnings
/// were emitted along the way.
///
/// # Errors
///
/// Returns an error when the root path cannot be normalized or traversed at
/// all; per-file failures are logged and skipped instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let root = path_utils::normalize(&cli.path)?;

    let config = FinderConfig::default().with_full_hash(cli.full_hash());
    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(&root)?;

    let identity = IdentityCache::new();
    let extractor = MetadataExtractor::new(&identity);
    let reporter = Reporter::new(&extractor);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report_stats = reporter.emit(&groups, &mut out)?;
    out.flush()?;

    let warnings = summary.warnings + report_stats.skipped;
    log::info!(
        "Scan complete: {} groups emitted, {} duplicate files, {} warnings",
        report_stats.emitted,
        summary.duplicate_files,
        warnings
    );

    if warnings > 0 {
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}
