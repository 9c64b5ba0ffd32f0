//! Configuration errors and batched diagnostics.

use super::FieldPath;
use owo_colors::OwoColorize;
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems, raised before any stylesheet is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// A single field-level problem.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", "→".red(), self.field, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Collects every validation error so the user sees them all at once.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
    /// Experimental fields the user set.
    experimental: Vec<String>,
    /// Dotted paths of every key the user set (`markup.template_guard`).
    present: FxHashSet<String>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics for a config in which exactly the `present` keys were set.
    pub fn with_present(present: impl IntoIterator<Item = String>) -> Self {
        Self {
            present: present.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Whether the user set `path`. Field status checks only fire for these.
    pub fn is_present(&self, path: &str) -> bool {
        self.present.contains(path)
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: None,
        });
    }

    pub fn error_with_hint(&mut self, field: FieldPath, message: impl Into<String>, hint: impl Into<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn experimental_hint(&mut self, field: FieldPath) {
        self.experimental.push(field.as_str().to_owned());
    }

    /// Hints are printed immediately and never fail validation.
    pub fn hint(&mut self, field: FieldPath, message: impl Into<String>) {
        crate::log!("hint"; "[{}] {}", field.as_str(), message.into());
    }

    #[cfg(test)]
    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    #[cfg(test)]
    pub fn experimental(&self) -> &[String] {
        &self.experimental
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Print experimental notes collected during validation.
    pub fn print_hints_and_warnings(&self) {
        if !self.experimental.is_empty() {
            crate::log!("hint"; "experimental config fields in use: {}", self.experimental.join(", "));
        }
    }

    pub fn into_result(self) -> Result<(), ConfigError> {
        if !self.has_errors() {
            Ok(())
        } else {
            Err(ConfigError::Diagnostics(self))
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid configuration:".red().bold())?;
        for err in &self.errors {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
