//! Class harvesting from selector text.
//!
//! Selectors are scanned textually for `.identifier` runs. Combinators,
//! pseudo-classes and attribute selectors are not interpreted, so a class
//! that only appears inside `:not(.x)` or `[href$=".pdf"]` is still
//! harvested. This imprecision is kept on purpose: tightening it would
//! change which classes existing configurations keep.
//!
//! The scanned text is the selector as lightningcss prints it back (see the
//! parent module), which preserves class names.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::StyleRuleTree;

/// `.` followed by an optional hyphen, a letter or underscore, then
/// letters, digits, underscores or hyphens.
static CLASS_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(-?[_a-zA-Z]+[_a-zA-Z0-9-]*)").unwrap());

/// Extract class names from one selector string, in order of appearance.
pub fn classes_in_selector(selector: &str) -> Vec<String> {
    CLASS_SELECTOR
        .captures_iter(selector)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Harvests class names from a [`StyleRuleTree`], memoizing per selector.
///
/// The cache lives as long as the harvester; large stylesheets repeat the
/// same selectors across media blocks and are scanned once.
#[derive(Debug, Default)]
pub struct ClassHarvester {
    cache: FxHashMap<String, Vec<String>>,
    scans: usize,
}

impl ClassHarvester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct class names referenced anywhere in the tree.
    pub fn harvest(&mut self, tree: &StyleRuleTree) -> FxHashSet<String> {
        let mut classes = FxHashSet::default();
        for rule in tree.simple_rules() {
            for selector in &rule.selectors {
                classes.extend(self.selector_classes(selector).iter().cloned());
            }
        }
        classes
    }

    fn selector_classes(&mut self, selector: &str) -> &[String] {
        if !self.cache.contains_key(selector) {
            self.scans += 1;
            self.cache
                .insert(selector.to_owned(), classes_in_selector(selector));
        }
        &self.cache[selector]
    }

    /// Number of distinct selectors actually scanned.
    #[cfg(test)]
    pub const fn scans(&self) -> usize {
        self.scans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::{SimpleRule, StyleRule, StyleSource, aggregate};

    fn set(items: &[&str]) -> FxHashSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_classes_in_selector() {
        assert_eq!(classes_in_selector(".foo"), ["foo"]);
        assert_eq!(classes_in_selector("div.a > p.b-c:hover"), ["a", "b-c"]);
        assert_eq!(classes_in_selector(".-neg ._under"), ["-neg", "_under"]);
        assert!(classes_in_selector("#id > a[href]").is_empty());
    }

    #[test]
    fn test_classes_in_selector_rejects_leading_digit() {
        assert!(classes_in_selector(".1col").is_empty());
        assert_eq!(classes_in_selector(".col-1"), ["col-1"]);
    }

    #[test]
    fn test_pseudo_argument_is_harvested() {
        // Exclusions inside :not() still count as usages.
        assert_eq!(classes_in_selector("a:not(.ignored)"), ["ignored"]);
    }

    #[test]
    fn test_harvest_concrete_stylesheet() {
        let css = ".foo { color: red; } @media (min-width: 1px) { .bar { color: blue; } }";
        let tree = aggregate(&[StyleSource::new("main.css", css)], "\n").unwrap();
        let classes = ClassHarvester::new().harvest(&tree);
        assert_eq!(classes, set(&["foo", "bar"]));
    }

    #[test]
    fn test_harvest_memoizes_repeated_selectors() {
        let rule = || SimpleRule {
            selectors: vec![".card .title".into()],
        };
        let tree = StyleRuleTree {
            rules: vec![
                StyleRule::Simple(rule()),
                StyleRule::Group(vec![rule(), rule()]),
                StyleRule::Simple(rule()),
            ],
            ..StyleRuleTree::default()
        };

        let mut harvester = ClassHarvester::new();
        let classes = harvester.harvest(&tree);
        assert_eq!(classes, set(&["card", "title"]));
        assert_eq!(harvester.scans(), 1);

        harvester.harvest(&tree);
        assert_eq!(harvester.scans(), 1);
    }
}
