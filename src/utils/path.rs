//! Path normalization.

use std::path::{Path, PathBuf};

/// Absolute form of `path`, canonicalized when it exists.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~`, then resolve relative paths against `base`.
pub fn resolve_against(path: &Path, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() { base.join(path) } else { path };
    normalize_path(&full)
}

/// `path` relative to `root`, or `path` itself when it lies outside.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_against_relative() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.css"), "").unwrap();
        let resolved = resolve_against(Path::new("a.css"), dir.path());
        assert_eq!(resolved, dir.path().join("a.css").canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_against_absolute_untouched() {
        let resolved = resolve_against(Path::new("/nonexistent/x.css"), Path::new("/base"));
        assert_eq!(resolved, PathBuf::from("/nonexistent/x.css"));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/site/a/b.html"), Path::new("/site")),
            PathBuf::from("a/b.html")
        );
        assert_eq!(
            relative_to(Path::new("/other/b.html"), Path::new("/site")),
            PathBuf::from("/other/b.html")
        );
    }
}
