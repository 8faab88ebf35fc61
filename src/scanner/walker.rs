//! Directory walker yielding regular files in deterministic encounter order.
//!
//! # Overview
//!
//! The [`Walker`] recursively descends a root directory and yields the
//! absolute path of every regular file. Symbolic links are never followed
//! and symlinked files are skipped outright, so a link can neither be
//! hashed nor reported.
//!
//! Traversal problems below the root (an unreadable subdirectory, an entry
//! that vanished mid-walk) surface as per-entry `Err` items the caller logs
//! and moves past. Only a missing or non-directory root is fatal.
//!
//! Entries are yielded sorted by file name within each directory so that
//! encounter order, and therefore representative selection downstream, is
//! stable across runs on an unchanged tree.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ScanError;

/// Recursive directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
}

impl Walker {
    /// Create a walker rooted at `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Walk the tree, yielding one result per discovered regular file.
    ///
    /// # Errors
    ///
    /// Fails up front with [`ScanError::NotFound`] or
    /// [`ScanError::NotADirectory`] when the root itself is unusable; no
    /// partial listing is produced in that case.
    pub fn walk(&self) -> Result<impl Iterator<Item = Result<PathBuf, ScanError>>, ScanError> {
        if !self.root.exists() {
            return Err(ScanError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        let iter = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => {
                    // file_type() does not follow links, so symlinks to
                    // files and directories alike fall through here.
                    if entry.file_type().is_file() {
                        Some(Ok(entry.into_path()))
                    } else {
                        if entry.file_type().is_symlink() {
                            log::debug!("skipping symlink {}", entry.path().display());
                        }
                        None
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| PathBuf::from("<unknown>"), Path::to_path_buf);
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk error"));
                    Some(Err(ScanError::Io { path, source }))
                }
            });

        Ok(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walk_missing_root_is_fatal() {
        let walker = Walker::new(Path::new("/no/such/root"));
        assert!(matches!(walker.walk(), Err(ScanError::NotFound(_))));
    }

    #[test]
    fn test_walk_file_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        let walker = Walker::new(&file);
        assert!(matches!(walker.walk(), Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_walk_yields_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("top.txt"), b"a").unwrap();
        fs::write(dir.path().join("sub/deep.txt"), b"b").unwrap();

        let walker = Walker::new(dir.path());
        let mut files: Vec<PathBuf> = walker.walk().unwrap().map(Result::unwrap).collect();
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("top.txt")));
        assert!(files.iter().any(|p| p.ends_with("sub/deep.txt")));
    }

    #[test]
    fn test_walk_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("only_dirs_here")).unwrap();

        let walker = Walker::new(dir.path());
        assert_eq!(walker.walk().unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlinked_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, b"payload").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("alias.txt")).unwrap();

        let walker = Walker::new(dir.path());
        let files: Vec<PathBuf> = walker.walk().unwrap().map(Result::unwrap).collect();

        // Only the real file; the symlink never shows up.
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("target.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_symlinked_directories() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("inside.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("mirror")).unwrap();

        let walker = Walker::new(dir.path());
        let files: Vec<PathBuf> = walker.walk().unwrap().map(Result::unwrap).collect();

        // inside.txt is seen once, through the real directory only.
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real/inside.txt"));
    }

    #[test]
    fn test_walk_order_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let walker = Walker::new(dir.path());
        let first: Vec<PathBuf> = walker.walk().unwrap().map(Result::unwrap).collect();
        let second: Vec<PathBuf> = walker.walk().unwrap().map(Result::unwrap).collect();

        assert_eq!(first, second);
        assert!(first[0].ends_with("a.txt"));
    }
}
