//! `[hooks]` section configuration.
//!
//! Classes used as script hooks never appear in a stylesheet, so they are
//! preserved by prefix.
//!
//! ```toml
//! [hooks]
//! js = true                   # keep `js-*` classes (default)
//! # js = false                # remove them like any other class
//! # js = ["js-", "hook-"]     # custom prefixes
//! ```

use crate::classify::HookSpec;
use crate::config::ConfigDiagnostics;
use macros::Config;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "hooks")]
pub struct HooksConfig {
    /// Script hook prefixes: `false`, `true` (`["js-"]`) or a list.
    pub js: HookSpec,
}

impl HooksConfig {
    /// An empty prefix would match every token and disable removal entirely.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let HookSpec::Prefixes(prefixes) = &self.js else {
            return;
        };
        if prefixes.iter().any(|p| p.is_empty()) {
            diag.error_with_hint(
                Self::FIELDS.js,
                "contains an empty prefix",
                format!("remove the empty entry or set {} = false", Self::FIELDS.js),
            );
        }
        if prefixes.is_empty() {
            diag.hint(Self::FIELDS.js, "empty list disables script hooks; prefer `false`");
        }
    }
}
