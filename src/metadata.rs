//! Metadata extraction: one `stat` per file, rendered the way `ls -l` would.
//!
//! # Overview
//!
//! The [`MetadataExtractor`] turns a path into a [`FileMetadataRecord`]:
//! inode, `-rw-r--r--`-style mode string, owner and group names (via the
//! [`IdentityCache`]), size in raw bytes and binary units, and the local
//! modification timestamp. Records are computed fresh per file; only the
//! identity lookups are cached across files.
//!
//! Extraction failures are warning-class: a file that vanished or turned
//! unreadable between traversal and probe yields an error the caller is
//! expected to log and skip, never to abort on.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::identity::{AccountDatabase, IdentityCache, SystemAccounts};

/// Binary-unit suffixes, 1024-based.
const UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Detailed information about a single file.
///
/// Field order mirrors the columns of the report output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadataRecord {
    /// Inode number.
    pub inode: u64,
    /// `ls -l` style mode string, e.g. `-rw-r--r--`.
    pub permissions: String,
    /// Owner name, or the stringified uid for deleted accounts.
    pub owner: String,
    /// Group name, or the stringified gid for deleted groups.
    pub group: String,
    /// Size in bytes.
    pub size: u64,
    /// Size in human-readable binary units, e.g. `1.5 KiB`.
    pub readable_size: String,
    /// Local modification time, `YYYY-MM-DD-HH:MM`.
    pub modified: String,
}

/// Errors that can occur while probing a file's metadata.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    /// The metadata probe itself failed (permissions, vanished file, ...).
    #[error("failed to stat {path}: {source}")]
    Stat {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Extracts [`FileMetadataRecord`]s, sharing one identity cache per scan.
pub struct MetadataExtractor<'a, D = SystemAccounts> {
    identity: &'a IdentityCache<D>,
}

impl<'a, D: AccountDatabase> MetadataExtractor<'a, D> {
    /// Create an extractor that resolves owner/group names through `identity`.
    #[must_use]
    pub fn new(identity: &'a IdentityCache<D>) -> Self {
        Self { identity }
    }

    /// Probe `path` and build its metadata record.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Stat`] when the underlying `stat` call
    /// fails. The caller should warn and skip the file.
    pub fn extract(&self, path: &Path) -> Result<FileMetadataRecord, MetadataError> {
        let meta = fs::metadata(path).map_err(|source| MetadataError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        let modified: DateTime<Local> = meta
            .modified()
            .map_err(|source| MetadataError::Stat {
                path: path.to_path_buf(),
                source,
            })?
            .into();

        Ok(FileMetadataRecord {
            inode: meta.ino(),
            permissions: permissions_string(meta.mode()),
            owner: self.identity.owner(meta.uid()),
            group: self.identity.group(meta.gid()),
            size: meta.size(),
            readable_size: readable_size(meta.size()),
            modified: modified.format("%Y-%m-%d-%H:%M").to_string(),
        })
    }
}

/// Convert a byte count into a human-readable size in binary units.
///
/// The value is divided by the largest fitting power of 1024, rounded to
/// three decimal places with trailing zeros trimmed. Zero renders as `0 B`
/// exactly, which also sidesteps the log-of-zero corner.
///
/// # Example
///
/// ```
/// use dupels::metadata::readable_size;
///
/// assert_eq!(readable_size(0), "0 B");
/// assert_eq!(readable_size(1024), "1 KiB");
/// assert_eq!(readable_size(1536), "1.5 KiB");
/// ```
#[must_use]
pub fn readable_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    // floor(log_1024(bytes)); u64 can never reach the YiB bucket but the
    // clamp keeps the indexing honest.
    let exponent = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut value = format!("{scaled:.3}");
    if value.contains('.') {
        value.truncate(value.trim_end_matches('0').trim_end_matches('.').len());
    }

    format!("{} {}", value, UNITS[exponent as usize])
}

/// Render a raw `st_mode` as the long-listing mode string, file-type
/// character included (e.g. `-rw-r--r--`, `drwxr-x---`).
#[must_use]
pub fn permissions_string(mode: u32) -> String {
    let type_char = match mode & 0o170_000 {
        0o140_000 => 's',
        0o120_000 => 'l',
        0o100_000 => '-',
        0o060_000 => 'b',
        0o040_000 => 'd',
        0o020_000 => 'c',
        0o010_000 => 'p',
        _ => '?',
    };

    let mut out = String::with_capacity(10);
    out.push(type_char);

    let rwx = [
        (mode >> 6) & 0o7, // user
        (mode >> 3) & 0o7, // group
        mode & 0o7,        // other
    ];
    for (i, bits) in rwx.iter().enumerate() {
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });

        // setuid/setgid replace the user/group execute slot, the sticky
        // bit replaces the other execute slot.
        let special = match i {
            0 => mode & 0o4000 != 0,
            1 => mode & 0o2000 != 0,
            _ => mode & 0o1000 != 0,
        };
        let execute = bits & 0o1 != 0;
        out.push(match (special, execute, i) {
            (true, true, 2) => 't',
            (true, false, 2) => 'T',
            (true, true, _) => 's',
            (true, false, _) => 'S',
            (false, true, _) => 'x',
            (false, false, _) => '-',
        });
    }

    out
}
