//! Field status checks called from `#[derive(Config)]` code.
//!
//! A field marked `#[config(status = experimental)]` is reported only when
//! the user set it, in the config file or on the command line.

use super::FieldPath;
use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Experimental,
}

pub fn check_field_status(field_path: &'static str, status: FieldStatus, diag: &mut ConfigDiagnostics) {
    let path = FieldPath::new(field_path);
    match status {
        FieldStatus::Experimental => diag.experimental_hint(path),
    }
}
