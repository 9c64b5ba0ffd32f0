//! Output destinations and fallback writes.
//!
//! A write failure only affects its own document. The fallback destination
//! sits next to the input: `page.html` -> `page.<suffix>.html`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

/// Where a document's rewritten text ended up.
#[derive(Debug)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The intended destination failed; the fallback succeeded.
    Fallback {
        intended: PathBuf,
        written: PathBuf,
        error: io::Error,
    },
    /// Both destinations failed.
    Failed {
        intended: PathBuf,
        fallback: PathBuf,
        error: io::Error,
    },
}

/// Destinations already handed out during one run.
#[derive(Debug, Default)]
pub struct Destinations {
    claimed: FxHashSet<PathBuf>,
}

impl Destinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path` for one document. Returns `false` if another document
    /// already owns it.
    pub fn claim(&mut self, path: &Path) -> bool {
        self.claimed.insert(path.to_path_buf())
    }
}

/// Destination for `relative` (path of the input below its collection root).
///
/// Without an output directory the input is rewritten in place.
pub fn destination(input: &Path, relative: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(relative),
        None => input.to_path_buf(),
    }
}

/// `dir/page.html` -> `dir/page.<suffix>.html`.
pub fn fallback_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}.{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{suffix}"),
    };
    input.with_file_name(name)
}

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Write `content` to `intended`, falling back to [`fallback_path`] of `input`.
pub fn write_with_fallback(input: &Path, intended: &Path, content: &[u8], suffix: &str) -> WriteOutcome {
    match write_file(intended, content) {
        Ok(()) => WriteOutcome::Written(intended.to_path_buf()),
        Err(first) => write_fallback(input, intended, content, suffix, first),
    }
}

/// Write `content` straight to [`fallback_path`]; `reason` says why
/// `intended` was not used.
pub fn write_fallback(
    input: &Path,
    intended: &Path,
    content: &[u8],
    suffix: &str,
    reason: io::Error,
) -> WriteOutcome {
    let intended = intended.to_path_buf();
    let fallback = fallback_path(input, suffix);
    match write_file(&fallback, content) {
        Ok(()) => WriteOutcome::Fallback {
            intended,
            written: fallback,
            error: reason,
        },
        Err(error) => WriteOutcome::Failed {
            intended,
            fallback,
            error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fallback_path() {
        assert_eq!(
            fallback_path(Path::new("site/index.html"), "declass"),
            PathBuf::from("site/index.declass.html")
        );
        assert_eq!(
            fallback_path(Path::new("README"), "declass"),
            PathBuf::from("README.declass")
        );
    }

    #[test]
    fn test_destination() {
        let input = Path::new("/src/site/a/b.html");
        assert_eq!(destination(input, Path::new("a/b.html"), None), input);
        assert_eq!(
            destination(input, Path::new("a/b.html"), Some(Path::new("/out"))),
            PathBuf::from("/out/a/b.html")
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.html");
        let target = dir.path().join("out/nested/in.html");

        let outcome = write_with_fallback(&input, &target, b"<p></p>", "declass");
        assert!(matches!(outcome, WriteOutcome::Written(ref p) if *p == target));
        assert_eq!(fs::read_to_string(&target).unwrap(), "<p></p>");
    }

    #[test]
    fn test_write_falls_back() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        // A regular file where a directory is needed makes the first write fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let target = blocker.join("page.html");

        let outcome = write_with_fallback(&input, &target, b"x", "declass");
        match outcome {
            WriteOutcome::Fallback { written, .. } => {
                assert_eq!(written, dir.path().join("page.declass.html"));
                assert_eq!(fs::read_to_string(written).unwrap(), "x");
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_write_both_fail() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let input = blocker.join("page.html");
        let target = blocker.join("out.html");

        let outcome = write_with_fallback(&input, &target, b"x", "declass");
        assert!(matches!(outcome, WriteOutcome::Failed { .. }));
    }

    #[test]
    fn test_destinations_claimed_once() {
        let mut destinations = Destinations::new();
        assert!(destinations.claim(Path::new("/out/index.html")));
        assert!(destinations.claim(Path::new("/out/a/index.html")));
        assert!(!destinations.claim(Path::new("/out/index.html")));
    }

    #[test]
    fn test_write_fallback_skips_intended() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let intended = dir.path().join("out/page.html");
        let reason = io::Error::new(io::ErrorKind::AlreadyExists, "taken");

        let outcome = write_fallback(&input, &intended, b"x", "declass", reason);
        assert!(matches!(outcome, WriteOutcome::Fallback { .. }));
        assert!(!intended.exists());
        assert_eq!(fs::read_to_string(dir.path().join("page.declass.html")).unwrap(), "x");
    }
}
