//! Stylesheet aggregation.
//!
//! Joins every stylesheet source into one text, parses it with lightningcss
//! and flattens the result into a [`StyleRuleTree`]: plain rules carrying
//! their selector strings, and grouping rules (`@media`, `@supports`,
//! `@container`, `@layer` blocks, nested style rules) carrying one level of
//! plain rules.
//!
//! ```text
//! [a.css, b.css] --join(sep)--> text --lightningcss--> StyleRuleTree
//! ```
//!
//! Parsing runs with lightningcss error recovery. Problems that only cost a
//! declaration (IE star hacks, unknown properties, bad values) become
//! [`StylesheetWarning`]s. Problems that drop a rule or a selector are
//! fatal: the harvested class set would be incomplete, and every later
//! removal decision depends on it.
//!
//! Selector strings are lightningcss's serialization of each parsed
//! selector, not the source text. Vendor pseudo-classes can come out
//! renamed (`:-ms-input-placeholder` prints as `:-ms-placeholder-shown`);
//! class names come out as written.

pub mod harvest;

pub use harvest::ClassHarvester;

use std::sync::{Arc, RwLock};

use lightningcss::error::{ErrorLocation, ParserError, SelectorError};
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::selector::SelectorList;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use thiserror::Error;

// ============================================================================
// Types
// ============================================================================

/// One stylesheet input. `id` is only used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSource {
    pub id: String,
    pub text: String,
}

impl StyleSource {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A rule with selectors, e.g. `.a, .b > .c { ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleRule {
    pub selectors: Vec<String>,
}

/// Top-level entry of a [`StyleRuleTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleRule {
    Simple(SimpleRule),
    /// Grouping block such as `@media (...) { ... }`.
    Group(Vec<SimpleRule>),
}

/// Parsed, owned view of the aggregated stylesheet text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleRuleTree {
    pub rules: Vec<StyleRule>,
    /// Problems the parser skipped over without losing a rule.
    pub warnings: Vec<StylesheetWarning>,
}

impl StyleRuleTree {
    /// Iterate over every plain rule, top-level and nested.
    pub fn simple_rules(&self) -> impl Iterator<Item = &SimpleRule> {
        self.rules.iter().flat_map(|rule| match rule {
            StyleRule::Simple(simple) => std::slice::from_ref(simple).iter(),
            StyleRule::Group(nested) => nested.iter(),
        })
    }
}

/// A declaration-level problem the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stylesheet `{source_id}`{}: {message}, ignored", position_suffix(.position))]
pub struct StylesheetWarning {
    pub source_id: String,
    pub message: String,
    pub position: Option<(u32, u32)>,
}

/// Stylesheet aggregation errors.
#[derive(Debug, Error)]
pub enum StylesheetError {
    /// Malformed CSS. Line and column are 1-based and relative to `source_id`.
    #[error("cannot parse stylesheet `{source_id}`{}: {message}", position_suffix(.position))]
    Parse {
        source_id: String,
        message: String,
        position: Option<(u32, u32)>,
    },

    /// lightningcss could not print a selector it parsed.
    #[error("cannot serialize selector in `{source_id}`: {message}")]
    Selector { source_id: String, message: String },
}

fn position_suffix(position: &Option<(u32, u32)>) -> String {
    position
        .map(|(line, column)| format!(" at {line}:{column}"))
        .unwrap_or_default()
}

// ============================================================================
// Aggregation
// ============================================================================

/// Line offset of one source inside the joined text (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceSpan {
    index: usize,
    first_line: u32,
}

/// Joined stylesheet text plus the bookkeeping to map errors back to inputs.
#[derive(Debug)]
struct Joined {
    text: String,
    spans: Vec<SourceSpan>,
}

impl Joined {
    fn new(sources: &[StyleSource], separator: &str) -> Self {
        let capacity = sources.iter().map(|s| s.text.len()).sum::<usize>()
            + separator.len() * sources.len().saturating_sub(1);
        let mut text = String::with_capacity(capacity);
        let mut spans = Vec::with_capacity(sources.len());
        let mut line = 0u32;

        for (index, source) in sources.iter().enumerate() {
            if index > 0 {
                text.push_str(separator);
                line += count_lines(separator);
            }
            spans.push(SourceSpan {
                index,
                first_line: line,
            });
            text.push_str(&source.text);
            line += count_lines(&source.text);
        }

        Self { text, spans }
    }

    /// Resolve a 0-based line of the joined text to `(source index, 1-based line)`.
    fn locate(&self, line: u32) -> Option<(usize, u32)> {
        self.spans
            .iter()
            .rev()
            .find(|span| span.first_line <= line)
            .map(|span| (span.index, line - span.first_line + 1))
    }

    /// Source id and 1-based `(line, column)` for a lightningcss location.
    fn place(&self, sources: &[StyleSource], loc: Option<&ErrorLocation>) -> (String, Option<(u32, u32)>) {
        let fallback_id = || {
            sources
                .first()
                .map(|s| s.id.clone())
                .unwrap_or_else(|| "<stylesheet>".into())
        };
        match loc {
            Some(loc) => match self.locate(loc.line) {
                Some((index, line)) => (sources[index].id.clone(), Some((line, loc.column))),
                None => (fallback_id(), Some((loc.line + 1, loc.column))),
            },
            None => (fallback_id(), None),
        }
    }
}

/// Whether recovering from `kind` drops a rule or a selector.
///
/// Unsupported pseudo-classes and pseudo-elements are kept in the parsed
/// selector; every other selector error discards its rule.
fn loses_rules(kind: &ParserError<'_>) -> bool {
    match kind {
        ParserError::SelectorError(
            SelectorError::UnsupportedPseudoClass(_) | SelectorError::UnsupportedPseudoElement(_),
        ) => false,
        ParserError::SelectorError(_)
        | ParserError::QualifiedRuleInvalid
        | ParserError::InvalidNesting
        | ParserError::MaximumNestingDepth => true,
        _ => false,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn count_lines(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}

/// Join `sources` with `separator` (between consecutive inputs only) and parse.
pub fn aggregate(sources: &[StyleSource], separator: &str) -> Result<StyleRuleTree, StylesheetError> {
    let joined = Joined::new(sources, separator);
    let recovered = Arc::new(RwLock::new(Vec::new()));
    let options = ParserOptions {
        error_recovery: true,
        warnings: Some(Arc::clone(&recovered)),
        ..ParserOptions::default()
    };

    let sheet = StyleSheet::parse(&joined.text, options).map_err(|err| {
        let (source_id, position) = joined.place(sources, err.loc.as_ref());
        StylesheetError::Parse {
            source_id,
            message: err.kind.to_string(),
            position,
        }
    })?;

    let mut warnings = Vec::new();
    if let Ok(recovered) = recovered.read() {
        for warning in recovered.iter() {
            let (source_id, position) = joined.place(sources, warning.loc.as_ref());
            let message = warning.kind.to_string();
            if loses_rules(&warning.kind) {
                return Err(StylesheetError::Parse {
                    source_id,
                    message,
                    position,
                });
            }
            warnings.push(StylesheetWarning {
                source_id,
                message,
                position,
            });
        }
    }

    let mut rules = Vec::with_capacity(sheet.rules.0.len());
    collect_rules(&sheet.rules, &mut rules).map_err(|message| StylesheetError::Selector {
        source_id: joined.place(sources, None).0,
        message,
    })?;

    Ok(StyleRuleTree { rules, warnings })
}

// ============================================================================
// Tree conversion
// ============================================================================

fn collect_rules(list: &CssRuleList<'_>, out: &mut Vec<StyleRule>) -> Result<(), String> {
    for rule in &list.0 {
        match rule {
            CssRule::Style(style) => {
                out.push(StyleRule::Simple(simple_rule(&style.selectors)?));
                if !style.rules.0.is_empty() {
                    let mut nested = Vec::new();
                    flatten_rules(&style.rules, &mut nested)?;
                    out.push(StyleRule::Group(nested));
                }
            }
            other => {
                if let Some(body) = group_body(other) {
                    let mut nested = Vec::new();
                    flatten_rules(body, &mut nested)?;
                    out.push(StyleRule::Group(nested));
                }
            }
        }
    }
    Ok(())
}

/// Deeper nesting (media inside media, nested style rules) is folded into
/// the enclosing group so the tree stays one level deep.
fn flatten_rules(list: &CssRuleList<'_>, out: &mut Vec<SimpleRule>) -> Result<(), String> {
    for rule in &list.0 {
        match rule {
            CssRule::Style(style) => {
                out.push(simple_rule(&style.selectors)?);
                flatten_rules(&style.rules, out)?;
            }
            other => {
                if let Some(body) = group_body(other) {
                    flatten_rules(body, out)?;
                }
            }
        }
    }
    Ok(())
}

fn group_body<'a, 'i>(rule: &'a CssRule<'i>) -> Option<&'a CssRuleList<'i>> {
    match rule {
        CssRule::Media(media) => Some(&media.rules),
        CssRule::Supports(supports) => Some(&supports.rules),
        CssRule::Container(container) => Some(&container.rules),
        CssRule::LayerBlock(layer) => Some(&layer.rules),
        _ => None,
    }
}

fn simple_rule(selectors: &SelectorList<'_>) -> Result<SimpleRule, String> {
    let selectors = selectors
        .0
        .iter()
        .map(|selector| {
            selector
                .to_css_string(PrinterOptions::default())
                .map_err(|err| err.to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SimpleRule { selectors })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(texts: &[&str]) -> Vec<StyleSource> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| StyleSource::new(format!("{i}.css"), *t))
            .collect()
    }

    #[test]
    fn test_join_separator_between_only() {
        let joined = Joined::new(&sources(&["a", "b", "c"]), "|");
        assert_eq!(joined.text, "a|b|c");

        let joined = Joined::new(&sources(&["only"]), "|");
        assert_eq!(joined.text, "only");

        let joined = Joined::new(&[], "|");
        assert!(joined.text.is_empty());
    }

    #[test]
    fn test_join_locates_source_lines() {
        let joined = Joined::new(&sources(&[".a {}\n.b {}", ".c {}"]), "\n");
        assert_eq!(joined.locate(0), Some((0, 1)));
        assert_eq!(joined.locate(1), Some((0, 2)));
        assert_eq!(joined.locate(2), Some((1, 1)));
    }

    #[test]
    fn test_aggregate_simple_and_media() {
        let tree = aggregate(
            &sources(&[".foo { color: red; } @media (min-width: 1px) { .bar { color: blue; } }"]),
            "\n",
        )
        .unwrap();

        assert_eq!(tree.rules.len(), 2);
        assert!(matches!(&tree.rules[0], StyleRule::Simple(rule) if rule.selectors == [".foo"]));
        match &tree.rules[1] {
            StyleRule::Group(nested) => {
                assert_eq!(nested.len(), 1);
                assert_eq!(nested[0].selectors, [".bar"]);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_splits_selector_list() {
        let tree = aggregate(&sources(&[".a, .b > .c { margin: 0 }"]), "\n").unwrap();
        let selectors: Vec<_> = tree.simple_rules().flat_map(|r| r.selectors.clone()).collect();
        assert_eq!(selectors.len(), 2);
        assert!(selectors[0].contains(".a"));
        assert!(selectors[1].contains(".c"));
    }

    #[test]
    fn test_aggregate_folds_deep_groups() {
        let css = "@supports (display: grid) { @media print { .deep { color: red } } }";
        let tree = aggregate(&sources(&[css]), "\n").unwrap();
        assert_eq!(tree.rules.len(), 1);
        let selectors: Vec<_> = tree.simple_rules().flat_map(|r| r.selectors.clone()).collect();
        assert_eq!(selectors, [".deep"]);
    }

    #[test]
    fn test_aggregate_ignores_rules_without_selectors() {
        let css = "@font-face { font-family: x; src: url(x.woff); } @keyframes spin { from { opacity: 0 } }";
        let tree = aggregate(&sources(&[css]), "\n").unwrap();
        assert!(tree.rules.is_empty());
    }

    #[test]
    fn test_aggregate_empty_input() {
        let tree = aggregate(&[], "\n").unwrap();
        assert!(tree.rules.is_empty());
    }

    #[test]
    fn test_aggregate_parse_error_names_source() {
        let inputs = sources(&[".ok { color: red }", "\n.broken..twice { color: red; }"]);
        let err = aggregate(&inputs, "\n").unwrap_err();
        match err {
            StylesheetError::Parse {
                source_id,
                position,
                ..
            } => {
                assert_eq!(source_id, "1.css");
                let (line, column) = position.unwrap();
                assert_eq!(line, 2);
                assert!(column >= 1);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_position_in_first_source() {
        let inputs = sources(&["\n\n.a..b {}", ".c {}"]);
        let err = aggregate(&inputs, "\n").unwrap_err();
        assert!(matches!(
            err,
            StylesheetError::Parse { ref source_id, position: Some((3, _)), .. } if source_id == "0.css"
        ));
        assert!(err.to_string().contains("0.css` at 3:"));
    }

    #[test]
    fn test_aggregate_recovers_declaration_hacks() {
        let css = ".clearfix { *zoom: 1; color: red; }\n.after { _height: 1px }";
        let tree = aggregate(&sources(&[css]), "\n").unwrap();
        let selectors: Vec<_> = tree.simple_rules().flat_map(|r| r.selectors.clone()).collect();
        assert_eq!(selectors, [".clearfix", ".after"]);
        assert!(!tree.warnings.is_empty());
        assert_eq!(tree.warnings[0].source_id, "0.css");
        assert_eq!(tree.warnings[0].position.map(|(line, _)| line), Some(1));
    }

    #[test]
    fn test_aggregate_lost_rule_is_fatal() {
        // An invalid selector drops the whole rule, and `.keep` with it.
        let css = ".ok {}\n.keep, h1(>h1) { color: red }";
        let err = aggregate(&sources(&[css]), "\n").unwrap_err();
        assert!(matches!(err, StylesheetError::Parse { position: Some((2, _)), .. }));
    }
}
