//! Scanner module for directory traversal and file hashing.
//!
//! Submodules:
//! - [`walker`]: recursive traversal yielding regular files, symlinks skipped
//! - [`hasher`]: BLAKE3 content fingerprints (64 KiB partial and full-file)
//! - [`path_utils`]: `~` expansion and absolutization of the root path

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

pub use hasher::{hash_to_hex, Hash, Hasher, PARTIAL_HASH_SIZE};
pub use walker::Walker;

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root path was not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while reading a directory entry.
    #[error("failed to read \"{path}\" due to \"{source}\" error")]
    Io {
        /// Path where the error occurred (best effort; traversal errors do
        /// not always carry one)
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while hashing file content.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// An I/O error occurred while reading the file.
    #[error("failed to read \"{path}\" due to \"{source}\" error")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
