//! Per-token keep/remove decisions.
//!
//! A token is kept when any of these hold:
//!
//! 1. it is a member of the allowed set (exact string match)
//! 2. the user predicate returns **`false`** for it
//! 3. hook checking is enabled and it starts with a hook prefix
//!
//! Rule 2 is an opt-out filter: `false` means "treat as valid". The
//! polarity is part of the public contract and is kept as is.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::allowlist::AllowedClassSet;

/// Default prefix for script hook classes.
pub const DEFAULT_HOOK_PREFIX: &str = "js-";

/// User filter. Returning `false` keeps the token.
pub type ClassPredicate = Arc<dyn Fn(&str, &AllowedClassSet) -> bool + Send + Sync>;

/// JS hook configuration: `false`, `true` (meaning `["js-"]`) or explicit prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookSpec {
    Enabled(bool),
    Prefixes(Vec<String>),
}

impl Default for HookSpec {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl HookSpec {
    /// Effective prefixes, in configured order. Empty when disabled.
    pub fn prefixes(&self) -> Vec<String> {
        match self {
            Self::Enabled(true) => vec![DEFAULT_HOOK_PREFIX.into()],
            Self::Enabled(false) => Vec::new(),
            Self::Prefixes(prefixes) => prefixes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Remove,
}

/// Everything a keep/remove decision depends on.
#[derive(Clone, Default)]
pub struct ClassificationConfig {
    pub allowed: AllowedClassSet,
    pub predicate: Option<ClassPredicate>,
    pub hook_prefixes: Vec<String>,
}

impl ClassificationConfig {
    pub fn new(allowed: AllowedClassSet) -> Self {
        Self {
            allowed,
            predicate: None,
            hook_prefixes: Vec::new(),
        }
    }

    pub fn with_predicate(mut self, predicate: ClassPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_hooks(mut self, hooks: &HookSpec) -> Self {
        self.hook_prefixes = hooks.prefixes();
        self
    }
}

impl fmt::Debug for ClassificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationConfig")
            .field("allowed", &self.allowed.len())
            .field("predicate", &self.predicate.is_some())
            .field("hook_prefixes", &self.hook_prefixes)
            .finish()
    }
}

/// Decide whether `token` survives under `config`.
pub fn classify(token: &str, config: &ClassificationConfig) -> Verdict {
    let keep = config.allowed.contains(token)
        || config
            .predicate
            .as_ref()
            .is_some_and(|predicate| !predicate(token, &config.allowed))
        || config
            .hook_prefixes
            .iter()
            .any(|prefix| token.starts_with(prefix.as_str()));

    if keep { Verdict::Keep } else { Verdict::Remove }
}

/// Shared, memoizing front end for [`classify`].
///
/// The configuration is immutable for the classifier's lifetime, so a
/// cached verdict per token is always valid. Safe to share across rayon
/// workers.
pub struct Classifier {
    config: ClassificationConfig,
    cache: DashMap<String, Verdict>,
}

impl Classifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self {
            config,
            cache: DashMap::new(),
        }
    }

    pub const fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    pub fn classify(&self, token: &str) -> Verdict {
        if let Some(verdict) = self.cache.get(token) {
            return *verdict;
        }
        let verdict = classify(token, &self.config);
        self.cache.insert(token.to_owned(), verdict);
        verdict
    }

    /// Number of distinct tokens decided so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish()
    }
}
