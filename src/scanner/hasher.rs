//! BLAKE3 content fingerprints.
//!
//! Two fingerprint flavors drive the duplicate funnel:
//!
//! - [`Hasher::partial_hash`] digests at most the first [`PARTIAL_HASH_SIZE`]
//!   bytes of a file. A short read is fine; files smaller than the window
//!   are simply hashed whole.
//! - [`Hasher::full_hash`] streams the entire file through the hasher in
//!   fixed-size chunks, so memory stays bounded regardless of file size.
//!
//! BLAKE3 emits 256-bit digests, which makes an accidental collision between
//! two real files a non-concern for any practical corpus.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::HashError;

/// A BLAKE3 digest (32 bytes).
pub type Hash = [u8; 32];

/// How much of a file the partial fingerprint covers: 64 KiB.
pub const PARTIAL_HASH_SIZE: u64 = 64 * 1024;

/// Read buffer size for streaming hashes.
const CHUNK_SIZE: usize = 64 * 1024;

/// Computes content fingerprints for candidate files.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hasher;

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash the first [`PARTIAL_HASH_SIZE`] bytes of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Io`] when the file cannot be opened or read,
    /// e.g. it vanished after traversal or permissions deny reading.
    pub fn partial_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|source| io_error(path, source))?;
        let mut limited = file.take(PARTIAL_HASH_SIZE);
        Self::digest(path, &mut limited)
    }

    /// Hash the entire content of `path`, streaming.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Io`] when the file cannot be opened or read.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|source| io_error(path, source))?;
        Self::digest(path, &mut file)
    }

    fn digest(path: &Path, reader: &mut impl Read) -> Result<Hash, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf).map_err(|source| io_error(path, source))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(*hasher.finalize().as_bytes())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> HashError {
    HashError::Io {
        path: PathBuf::from(path),
        source,
    }
}

/// Convert a hash to its lowercase hex representation (logging helper).
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut out = String::with_capacity(64);
    for byte in hash {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
