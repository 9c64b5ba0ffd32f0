//! Dotted config field paths.

use owo_colors::OwoColorize;
use std::fmt;

/// Path of a config field, e.g. `classes.presets`.
///
/// Generated for every section by `#[derive(Config)]` as `Section::FIELDS.name`,
/// so diagnostics never spell field names by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).cyan())
    }
}
