//! Allowed class set composition.
//!
//! The allowed set is the union of:
//!
//! | Source            | Shape                                        |
//! |-------------------|----------------------------------------------|
//! | harvested classes | every `.class` found in the stylesheets      |
//! | custom classes    | `"a b c"` or `["a", "b", "c"]`               |
//! | presets           | `name = false \| true \| "a b" \| ["a", "b"]` |
//!
//! Strings are split on runs of whitespace. Duplicates collapse silently.

pub mod preset;

pub use preset::{PRESET_VERSION, PRESETS};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Config-facing inputs
// ============================================================================

/// A class list given either as one whitespace-delimited string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassList {
    Words(String),
    List(Vec<String>),
}

impl Default for ClassList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ClassList {
    /// Individual class tokens. List entries are split on whitespace as well.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Words(words) => words.split_whitespace().collect(),
            Self::List(items) => items.iter().flat_map(|s| s.split_whitespace()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }
}

/// A preset toggle: disabled, the built-in list, or an explicit override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetToggle {
    Enabled(bool),
    Classes(ClassList),
}

impl Default for PresetToggle {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

// ============================================================================
// AllowedClassSet
// ============================================================================

/// Read-only set of class names that always survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedClassSet {
    classes: FxHashSet<String>,
}

impl AllowedClassSet {
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.classes.contains(token)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedClassSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<FxHashSet<String>> for AllowedClassSet {
    fn from(classes: FxHashSet<String>) -> Self {
        Self { classes }
    }
}

// ============================================================================
// Composition
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllowlistError {
    #[error("unknown preset `{name}` (known presets: {known})")]
    UnknownPreset { name: String, known: String },
}

/// Merge harvested classes, custom classes and enabled presets.
pub fn compose(
    harvested: FxHashSet<String>,
    custom: &ClassList,
    presets: &BTreeMap<String, PresetToggle>,
) -> Result<AllowedClassSet, AllowlistError> {
    let mut classes = harvested;
    classes.extend(custom.tokens().into_iter().map(str::to_owned));

    for (name, toggle) in presets {
        let Some(builtin) = preset::lookup(name) else {
            return Err(AllowlistError::UnknownPreset {
                name: name.clone(),
                known: preset::known_names(),
            });
        };
        match toggle {
            PresetToggle::Enabled(false) => {}
            PresetToggle::Enabled(true) => {
                classes.extend(builtin.classes.iter().map(|&c| c.to_owned()));
            }
            PresetToggle::Classes(list) => {
                classes.extend(list.tokens().into_iter().map(str::to_owned));
            }
        }
    }

    Ok(AllowedClassSet { classes })
}
