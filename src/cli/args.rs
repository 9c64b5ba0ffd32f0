//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Remove CSS classes that no stylesheet uses from HTML documents
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTML files or directories to rewrite (extends `[markup].files`)
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub inputs: Vec<PathBuf>,

    /// Stylesheet to harvest classes from, repeatable (extends `[stylesheet].files`)
    #[arg(short = 's', long = "css", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub css: Vec<PathBuf>,

    /// Extra classes to keep, whitespace delimited, repeatable
    #[arg(short = 'k', long = "classes", visible_alias = "keep", value_name = "CLASSES")]
    pub classes: Vec<String>,

    /// Enable a built-in preset, repeatable (bootstrap, h5bp)
    #[arg(short = 'p', long = "preset", value_name = "NAME")]
    pub presets: Vec<String>,

    /// Keep classes with this prefix, repeatable (replaces the default `js-`)
    #[arg(long = "hook-prefix", value_name = "PREFIX", conflicts_with = "no_js_hooks")]
    pub hook_prefixes: Vec<String>,

    /// Do not preserve script hook classes
    #[arg(long)]
    pub no_js_hooks: bool,

    /// Rewrite markup inside `<script type="text/html">` blocks
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub template_guard: Option<bool>,

    /// Output directory path (default: rewrite in place)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Report without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print each removal
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Print the default configuration template and exit
    #[arg(long)]
    pub print_config: bool,

    /// Config file path (default: declass.toml)
    #[arg(short = 'C', long, default_value = "declass.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
