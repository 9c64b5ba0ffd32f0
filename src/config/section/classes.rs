//! `[classes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [classes]
//! custom = "is-active is-hidden"      # or ["is-active", "is-hidden"]
//! filter = ["^theme-", "^wp-"]        # tokens matching any pattern are kept
//!
//! [classes.presets]
//! bootstrap = true                    # built-in list
//! h5bp = "no-js clearfix"             # explicit override
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::allowlist::{AllowedClassSet, ClassList, PresetToggle, preset};
use crate::classify::ClassPredicate;
use crate::config::ConfigDiagnostics;
use macros::Config;
use regex::RegexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "classes")]
pub struct ClassesConfig {
    /// Classes that always survive, besides the harvested ones.
    pub custom: ClassList,

    /// Regex patterns. Matching tokens are kept.
    pub filter: Vec<String>,

    /// Built-in class lists, by name.
    pub presets: BTreeMap<String, PresetToggle>,
}

impl ClassesConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for name in self.presets.keys() {
            if preset::lookup(name).is_none() {
                diag.error_with_hint(
                    Self::FIELDS.presets,
                    format!("unknown preset `{name}`"),
                    format!("known presets: {}", preset::known_names()),
                );
            }
        }

        if let Err(err) = RegexSet::new(&self.filter) {
            diag.error(Self::FIELDS.filter, format!("invalid pattern: {err}"));
        }
    }

    /// Classification predicate built from `filter`, if any pattern is set.
    ///
    /// The predicate answers `false` for matching tokens, which keeps them.
    pub fn predicate(&self) -> Option<ClassPredicate> {
        if self.filter.is_empty() {
            return None;
        }
        let set = RegexSet::new(&self.filter).ok()?;
        Some(Arc::new(move |token: &str, _: &AllowedClassSet| !set.is_match(token)))
    }
}
