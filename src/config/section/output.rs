//! `[output]` section configuration.
//!
//! ```toml
//! [output]
//! dir = "dist"                # omit to rewrite documents in place
//! fallback_suffix = "declass" # page.html -> page.declass.html when a write fails
//! dry_run = false             # report only, write nothing
//! ```

use crate::config::ConfigDiagnostics;
use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "output")]
pub struct OutputConfig {
    /// Output directory. Inputs keep their layout below it.
    pub dir: Option<PathBuf>,

    /// Suffix of the fallback file written next to the input.
    #[config(inline_doc = "Fallback file suffix.")]
    pub fallback_suffix: String,

    /// Report results without writing anything.
    #[config(inline_doc = "Report only.")]
    pub dry_run: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            fallback_suffix: "declass".into(),
            dry_run: false,
        }
    }
}

impl OutputConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let suffix = &self.fallback_suffix;
        if suffix.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.fallback_suffix,
                "must not be empty",
                "an empty suffix would overwrite the input",
            );
        } else if suffix.contains(['/', '\\']) {
            diag.error(
                Self::FIELDS.fallback_suffix,
                format!("`{suffix}` must not contain path separators"),
            );
        }
    }
}
