//! Root-path normalization: `~` expansion and absolutization.

use std::io;
use std::path::{Path, PathBuf};

/// Normalize a user-supplied path.
///
/// A leading `~` or `~/` is expanded to `$HOME`, then the path is resolved
/// to absolute form against the current directory. Symlinks inside the path
/// are left alone; only the spelling is normalized.
///
/// # Errors
///
/// Fails when the current directory is unavailable or the path is empty.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand_tilde(path);
    std::path::absolute(expanded)
}

/// Expand a leading `~` using the `HOME` environment variable.
///
/// Paths without a leading `~`, and `~user` forms (which need an account
/// database walk the original never did), pass through untouched.
fn expand_tilde(path: &Path) -> PathBuf {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix('~')) else {
        return path.to_path_buf();
    };
    if !rest.is_empty() && !rest.starts_with('/') {
        return path.to_path_buf();
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest.trim_start_matches('/')),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absolute_path_is_unchanged() {
        let normalized = normalize(Path::new("/usr/share")).unwrap();
        assert_eq!(normalized, PathBuf::from("/usr/share"));
    }

    #[test]
    fn test_normalize_relative_path_becomes_absolute() {
        let normalized = normalize(Path::new("some/dir")).unwrap();
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("some/dir"));
    }

    #[test]
    fn test_expand_tilde_alone() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expand_tilde(Path::new("~")), PathBuf::from(&home));
            assert_eq!(
                expand_tilde(Path::new("~/docs")),
                PathBuf::from(&home).join("docs")
            );
        }
    }

    #[test]
    fn test_tilde_user_form_passes_through() {
        assert_eq!(
            expand_tilde(Path::new("~otheruser/docs")),
            PathBuf::from("~otheruser/docs")
        );
    }

    #[test]
    fn test_interior_tilde_passes_through() {
        assert_eq!(
            expand_tilde(Path::new("/data/~backup")),
            PathBuf::from("/data/~backup")
        );
    }
}
