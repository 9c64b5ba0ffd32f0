//! declass - remove CSS classes that no stylesheet uses from HTML documents.

mod allowlist;
mod classify;
mod cli;
mod config;
mod engine;
mod logger;
mod output;
mod rewrite;
mod stats;
mod stylesheet;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, report};
use config::DeclassConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if cli.print_config {
        print!("{}", DeclassConfig::template());
        return Ok(());
    }

    let config = DeclassConfig::load(&cli)?;
    let report = cli::run::run(&config)?;

    if cli.json {
        report::print_json(&report)
    } else {
        report::print_text(&report);
        Ok(())
    }
}
