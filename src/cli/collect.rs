//! Input collection: stylesheets and HTML documents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use crate::log;
use crate::stylesheet::StyleSource;

/// File extensions treated as HTML when walking a directory.
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// One HTML document to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlInput {
    pub path: PathBuf,
    /// Path below the collection root; used to place output under `[output].dir`.
    pub relative: PathBuf,
}

/// Read stylesheets in order. Missing files are reported and skipped.
pub fn read_stylesheets(paths: &[PathBuf]) -> Result<Vec<StyleSource>> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.is_file() {
            log!("warning"; "stylesheet not found, skipping: {}", path.display());
            continue;
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet {}", path.display()))?;
        sources.push(StyleSource::new(path.display().to_string(), text));
    }
    Ok(sources)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Placement of an explicitly listed file below `base`.
///
/// A file outside `base` keeps only its file name; clashes between such
/// files are settled when destinations are claimed.
fn placement(file: &Path, base: &Path) -> PathBuf {
    match file.strip_prefix(base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => file
            .file_name()
            .map_or_else(|| file.to_path_buf(), PathBuf::from),
    }
}

/// Expand files and directories into HTML inputs.
///
/// Explicit files are taken as given and placed relative to `base`;
/// directories contribute their `.html` and `.htm` files in sorted order,
/// placed relative to the directory. A path listed twice is kept once.
pub fn collect_html(paths: &[PathBuf], base: &Path) -> Vec<HtmlInput> {
    let mut seen = FxHashSet::default();
    let mut inputs = Vec::new();

    for root in paths {
        if root.is_file() {
            let relative = placement(root, base);
            if seen.insert(root.clone()) {
                inputs.push(HtmlInput {
                    path: root.clone(),
                    relative,
                });
            }
        } else if root.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(root)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path())
                .filter(|p| is_html(p))
                .collect();
            found.sort();

            for path in found {
                if seen.insert(path.clone()) {
                    let relative = crate::utils::path::relative_to(&path, root);
                    inputs.push(HtmlInput { path, relative });
                }
            }
        } else {
            log!("warning"; "input not found, skipping: {}", root.display());
        }
    }

    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_stylesheets_skipped() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("a.css");
        fs::write(&present, ".a {}").unwrap();

        let sources =
            read_stylesheets(&[dir.path().join("missing.css"), present.clone()]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, present.display().to_string());
        assert_eq!(sources[0].text, ".a {}");
    }

    #[test]
    fn test_collect_directory_sorted_html_only() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("blog/2024")).unwrap();
        for name in ["index.html", "b.htm", "blog/2024/post.HTML", "style.css", "notes.txt"] {
            fs::write(root.join(name), "").unwrap();
        }

        let inputs = collect_html(&[root.to_path_buf()], Path::new("/elsewhere"));
        let relative: Vec<_> = inputs.iter().map(|i| i.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("b.htm"),
                PathBuf::from("blog/2024/post.HTML"),
                PathBuf::from("index.html"),
            ]
        );
    }

    #[test]
    fn test_collect_file_and_dedupe() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.xhtml");
        fs::write(&page, "").unwrap();

        // Explicit files are taken regardless of extension.
        let inputs = collect_html(
            &[page.clone(), page.clone(), dir.path().join("missing")],
            dir.path(),
        );
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].relative, PathBuf::from("page.xhtml"));
    }

    #[test]
    fn test_collect_files_keep_path_below_base() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for sub in ["a", "b"] {
            fs::create_dir(root.join(sub)).unwrap();
            fs::write(root.join(sub).join("index.html"), "").unwrap();
        }

        let inputs = collect_html(
            &[root.join("a/index.html"), root.join("b/index.html")],
            root,
        );
        let relative: Vec<_> = inputs.iter().map(|i| i.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("a/index.html"), PathBuf::from("b/index.html")]
        );
    }

    #[test]
    fn test_collect_file_outside_base_uses_file_name() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "").unwrap();

        let inputs = collect_html(&[page], Path::new("/elsewhere"));
        assert_eq!(inputs[0].relative, PathBuf::from("page.html"));
    }
}
