//! Configuration support types.
//!
//! | Module   | Purpose                                   |
//! |----------|-------------------------------------------|
//! | `error`  | `ConfigError` and batched diagnostics     |
//! | `field`  | `FieldPath` used by `#[derive(Config)]`    |
//! | `status` | experimental field reporting              |

mod error;
mod field;
pub mod status;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
pub use status::FieldStatus;
