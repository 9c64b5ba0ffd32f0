//! `[markup]` section configuration.
//!
//! ```toml
//! [markup]
//! files = ["public"]          # HTML files or directories (walked for .html/.htm)
//! template_guard = false      # also rewrite <script type="text/html"> content
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "markup")]
pub struct MarkupConfig {
    /// HTML documents to rewrite.
    pub files: Vec<PathBuf>,

    /// Treat markup inside `<script type="text/html">` as regular markup.
    #[config(status = experimental)]
    pub template_guard: bool,
}
