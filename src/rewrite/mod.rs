//! Markup rewriting.
//!
//! Streams one document through lol_html, visiting every element that has a
//! `class` attribute. Markup that is not touched is emitted byte for byte,
//! so attribute order, entities and whitespace elsewhere survive.
//!
//! # Per element
//!
//! ```text
//! class="foo bar baz js-widget"
//!   split  -> [foo, bar, baz, js-widget]
//!   verdict ->  K    K    R    K
//!   join   -> class="foo bar js-widget"      (empty -> attribute removed)
//! ```

pub mod guard;

use lol_html::{RewriteStrSettings, element, rewrite_str};
use smallvec::SmallVec;

use crate::classify::{Classifier, Verdict};
use crate::stats::ClassStats;

/// Tokens of one element's class attribute, in source order.
pub type ElementClassList<'a> = SmallVec<[&'a str; 8]>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Rename `<script type="text/html">` blocks so their markup is rewritten too.
    pub template_guard: bool,
}

/// One element that lost at least one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRecord {
    pub tag: String,
    pub original: Vec<String>,
    pub removed: Vec<String>,
}

/// Result of rewriting one document.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub html: String,
    pub stats: ClassStats,
    pub removals: Vec<RemovalRecord>,
    /// Set when the rewriter gave up and passed the input through unchanged.
    pub degraded: Option<String>,
}

/// Keep/remove split of one element's tokens.
#[derive(Debug, Default)]
struct Partition<'a> {
    kept: ElementClassList<'a>,
    removed: ElementClassList<'a>,
}

impl<'a> Partition<'a> {
    fn of(value: &'a str, classifier: &Classifier) -> Self {
        let mut partition = Self::default();
        for token in value.split_whitespace() {
            match classifier.classify(token) {
                Verdict::Keep => partition.kept.push(token),
                Verdict::Remove => partition.removed.push(token),
            }
        }
        partition
    }
}

/// Rewrite `html`, dropping every class the classifier rejects.
pub fn rewrite_document(html: &str, classifier: &Classifier, options: RewriteOptions) -> RewriteOutcome {
    let source = if options.template_guard {
        guard::escape(html)
    } else {
        std::borrow::Cow::Borrowed(html)
    };

    let mut stats = ClassStats::new();
    let mut removals = Vec::new();

    let result = rewrite_str(
        &source,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[class]", |el| {
                let Some(value) = el.get_attribute("class") else {
                    return Ok(());
                };
                let partition = Partition::of(&value, classifier);
                stats.record_element(partition.kept.len(), partition.removed.as_slice());

                if !partition.removed.is_empty() {
                    removals.push(RemovalRecord {
                        tag: guard::display_tag(&el.tag_name()).to_owned(),
                        original: value.split_whitespace().map(str::to_owned).collect(),
                        removed: partition.removed.iter().map(|s| (*s).to_owned()).collect(),
                    });
                }

                if partition.kept.is_empty() {
                    el.remove_attribute("class");
                } else {
                    let joined = partition.kept.join(" ");
                    if joined != value {
                        el.set_attribute("class", &joined)?;
                    }
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    match result {
        Ok(rewritten) => RewriteOutcome {
            html: if options.template_guard {
                guard::restore(&rewritten)
            } else {
                rewritten
            },
            stats,
            removals,
            degraded: None,
        },
        Err(err) => RewriteOutcome {
            html: html.to_owned(),
            stats: ClassStats::new(),
            removals: Vec::new(),
            degraded: Some(err.to_string()),
        },
    }
}
