//! Command-line interface definitions for dupels.
//!
//! A single-purpose CLI: one positional root path plus a handful of flags,
//! defined with the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # List every file under a tree, flagging duplicates
//! dupels ~/data
//!
//! # Faster, weaker mode: stop after the partial-hash stage
//! dupels ~/data --no-full-hash
//!
//! # Verbose mode for debugging
//! dupels -v ~/data
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Duplicate-aware recursive file lister.
///
/// Recursively lists every regular file under PATH with `ls`-style metadata,
/// grouping byte-identical files so each group prints once with its copies
/// listed alongside. Symbolic links are skipped.
#[derive(Debug, Parser)]
#[command(name = "dupels")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to list recursively ("~" is expanded, relative paths
    /// are resolved against the current directory)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Stop after the partial-hash stage instead of confirming duplicates
    /// with a full-content hash
    ///
    /// Files that agree on size and on their first 64 KiB are then reported
    /// as duplicates without reading the rest of their content. Faster, but
    /// the grouping is only an approximation.
    #[arg(long)]
    pub no_full_hash: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report itself
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Whether the full-content hashing stage should run.
    #[must_use]
    pub fn full_hash(&self) -> bool {
        !self.no_full_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_full_hash() {
        let cli = Cli::parse_from(["dupels", "/tmp"]);
        assert!(cli.full_hash());
        assert_eq!(cli.path, PathBuf::from("/tmp"));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_no_full_hash_flag() {
        let cli = Cli::parse_from(["dupels", "/tmp", "--no-full-hash"]);
        assert!(!cli.full_hash());
    }

    #[test]
    fn test_cli_verbosity_counts() {
        let cli = Cli::parse_from(["dupels", "-vv", "/tmp"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dupels", "-v", "-q", "/tmp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_path() {
        let result = Cli::try_parse_from(["dupels"]);
        assert!(result.is_err());
    }
}
