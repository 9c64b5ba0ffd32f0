//! Run orchestration.
//!
//! ```text
//! ┌──────────────── once, up front ────────────────┐
//! │ stylesheets -> aggregate -> harvest -> compose │ -> Classifier (shared, read-only)
//! └────────────────────────────────────────────────┘
//! ┌──────────────── per document (rayon) ──────────┐
//! │ html -> rewrite_document -> RewriteOutcome     │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Every document depends on the complete allowed set, so nothing is
//! rewritten until the first phase has finished. Documents are independent
//! of each other and run in parallel; their stats are merged afterwards by
//! the caller, in input order.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use crate::allowlist::{AllowlistError, ClassList, PresetToggle, compose};
use crate::classify::{ClassPredicate, ClassificationConfig, Classifier, HookSpec};
use crate::rewrite::{RewriteOptions, RewriteOutcome, rewrite_document};
use crate::stylesheet::{ClassHarvester, StyleSource, StylesheetError, StylesheetWarning, aggregate};

/// Everything the core needs besides the inputs themselves.
#[derive(Clone, Default)]
pub struct EngineSettings {
    pub separator: String,
    pub custom: ClassList,
    pub presets: BTreeMap<String, PresetToggle>,
    pub hooks: HookSpec,
    pub predicate: Option<ClassPredicate>,
    pub template_guard: bool,
}

/// One HTML input. `id` is only used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),

    #[error(transparent)]
    Allowlist(#[from] AllowlistError),
}

/// Non-fatal per-document problems. The run continues after each of them.
#[derive(Debug, Error)]
pub enum DocumentIssue {
    #[error("{}: markup could not be rewritten, left unchanged ({})", .id, .reason)]
    Degraded { id: String, reason: String },

    #[error("{}: cannot write `{}` ({}), wrote `{}` instead", .id, .intended.display(), .error, .written.display())]
    WriteFallback {
        id: String,
        intended: PathBuf,
        written: PathBuf,
        error: io::Error,
    },

    #[error("{}: cannot write `{}` or `{}`: {}", .id, .intended.display(), .fallback.display(), .error)]
    WriteFailed {
        id: String,
        intended: PathBuf,
        fallback: PathBuf,
        error: io::Error,
    },
}

/// A ready-to-use rewriter: the allowed set is final once this exists.
#[derive(Debug)]
pub struct Engine {
    classifier: Classifier,
    options: RewriteOptions,
    harvested: usize,
    warnings: Vec<StylesheetWarning>,
}

impl Engine {
    /// Aggregate stylesheets, harvest classes and compose the allowed set.
    pub fn build(stylesheets: &[StyleSource], settings: &EngineSettings) -> Result<Self, EngineError> {
        let tree = aggregate(stylesheets, &settings.separator)?;
        let harvested = ClassHarvester::new().harvest(&tree);
        let harvested_len = harvested.len();
        let allowed = compose(harvested, &settings.custom, &settings.presets)?;

        let mut config = ClassificationConfig::new(allowed).with_hooks(&settings.hooks);
        if let Some(predicate) = &settings.predicate {
            config = config.with_predicate(Arc::clone(predicate));
        }

        Ok(Self {
            classifier: Classifier::new(config),
            options: RewriteOptions {
                template_guard: settings.template_guard,
            },
            harvested: harvested_len,
            warnings: tree.warnings,
        })
    }

    /// Number of distinct classes found in the stylesheets.
    pub const fn harvested(&self) -> usize {
        self.harvested
    }

    /// Size of the final allowed set.
    pub fn allowed(&self) -> usize {
        self.classifier.config().allowed.len()
    }

    /// Distinct class tokens decided so far, across all documents.
    pub fn classified(&self) -> usize {
        self.classifier.cached()
    }

    /// Stylesheet problems that were skipped without losing a rule.
    pub fn warnings(&self) -> &[StylesheetWarning] {
        &self.warnings
    }

    pub fn rewrite(&self, document: &Document) -> RewriteOutcome {
        rewrite_document(&document.text, &self.classifier, self.options)
    }

    /// Rewrite all documents in parallel. Output order matches input order.
    ///
    /// `on_done` gets each finished document's index, from worker threads,
    /// in completion order.
    pub fn rewrite_each<F>(&self, documents: &[Document], on_done: F) -> Vec<RewriteOutcome>
    where
        F: Fn(usize) + Sync,
    {
        documents
            .par_iter()
            .enumerate()
            .map(|(index, doc)| {
                let outcome = self.rewrite(doc);
                on_done(index);
                outcome
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{RunStats, Tally};

    fn settings() -> EngineSettings {
        EngineSettings {
            separator: "\n".into(),
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_build_counts() {
        let css = [
            StyleSource::new("a.css", ".one, .two {}"),
            StyleSource::new("b.css", ".two .three {}"),
        ];
        let engine = Engine::build(
            &css,
            &EngineSettings {
                custom: ClassList::Words("extra one".into()),
                ..settings()
            },
        )
        .unwrap();
        assert_eq!(engine.harvested(), 3);
        assert_eq!(engine.allowed(), 4);
    }

    #[test]
    fn test_build_fails_on_broken_css() {
        let css = [StyleSource::new("bad.css", ".a..b { color: red }")];
        let err = Engine::build(&css, &settings()).unwrap_err();
        assert!(matches!(err, EngineError::Stylesheet(_)));
        assert!(err.to_string().contains("bad.css"));
    }

    #[test]
    fn test_build_keeps_recovered_warnings() {
        let css = [StyleSource::new("legacy.css", ".a { *zoom: 1; } .b {}")];
        let engine = Engine::build(&css, &settings()).unwrap();
        assert_eq!(engine.harvested(), 2);
        assert_eq!(engine.warnings().len(), 1);
        assert!(engine.warnings()[0].to_string().contains("legacy.css"));
    }

    #[test]
    fn test_build_fails_on_unknown_preset() {
        let mut s = settings();
        s.presets.insert("nope".into(), PresetToggle::Enabled(true));
        let err = Engine::build(&[], &s).unwrap_err();
        assert!(matches!(err, EngineError::Allowlist(_)));
    }

    #[test]
    fn test_rewrite_each_keeps_order_and_merges() {
        let css = [StyleSource::new("main.css", ".keep {}")];
        let engine = Engine::build(&css, &settings()).unwrap();
        let docs: Vec<_> = (0..16)
            .map(|i| Document::new(format!("{i}.html"), format!(r#"<p class="keep drop{i}">{i}</p>"#)))
            .collect();

        let outcomes = engine.rewrite_each(&docs, |_| {});
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.html, format!(r#"<p class="keep">{i}</p>"#));
        }

        let mut run = RunStats::new();
        for outcome in &outcomes {
            run.add_document(&outcome.stats);
        }
        let summary = run.finalize();
        assert_eq!(
            summary.tally,
            Tally {
                removed: 16,
                kept: 16,
                all: 32
            }
        );
        assert_eq!(summary.removed_names.len(), 16);
    }

    #[test]
    fn test_default_hooks_enabled() {
        let engine = Engine::build(&[], &settings()).unwrap();
        let out = engine.rewrite(&Document::new("x", r#"<b class="js-x y"></b>"#));
        assert_eq!(out.html, r#"<b class="js-x"></b>"#);
    }

    #[test]
    fn test_rewrite_each_reports_every_document() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let engine = Engine::build(&[], &settings()).unwrap();
        let docs: Vec<_> = (0..8)
            .map(|i| Document::new(format!("{i}.html"), "<p class=\"x\"></p>"))
            .collect();
        let done = AtomicUsize::new(0);
        let outcomes = engine.rewrite_each(&docs, |_| {
            done.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(outcomes.len(), 8);
        assert_eq!(done.load(Ordering::Relaxed), 8);
        // Every document shares one verdict cache.
        assert_eq!(engine.classified(), 1);
    }
}
