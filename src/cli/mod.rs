//! Command-line interface module.

mod args;
pub mod collect;
pub mod report;
pub mod run;

pub use args::Cli;
