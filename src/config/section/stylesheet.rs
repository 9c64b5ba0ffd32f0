//! `[stylesheet]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [stylesheet]
//! files = ["css/site.css", "css/print.css"]
//! separator = "\n"
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stylesheets whose selectors define the harvested classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "stylesheet")]
pub struct StylesheetConfig {
    /// CSS files, in aggregation order (relative to the config file).
    pub files: Vec<PathBuf>,

    /// Text inserted between consecutive stylesheets before parsing.
    #[config(inline_doc = "Joiner between stylesheets.")]
    pub separator: String,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            separator: "\n".into(),
        }
    }
}
