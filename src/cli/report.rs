//! Run summary rendering: colored lines on stderr or JSON on stdout.

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::log;
use crate::stats::{RunSummary, Tally};
use crate::utils::plural::{plural_count, plural_word};

/// What happened to one document's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Fallback,
    Failed,
    DryRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    /// Markup was passed through unchanged.
    pub degraded: bool,
    #[serde(flatten)]
    pub tally: Tally,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub harvested: usize,
    pub allowed: usize,
    pub files: Vec<FileReport>,
    #[serde(flatten)]
    pub summary: RunSummary,
}

fn tally_line(tally: Tally) -> String {
    format!(
        "removed {} / kept {} / all {}",
        tally.removed.red(),
        tally.kept.green(),
        tally.all
    )
}

/// Human-readable report on stderr.
pub fn print_text(report: &RunReport) {
    for file in &report.files {
        let status = match file.status {
            FileStatus::Written | FileStatus::DryRun => String::new(),
            FileStatus::Fallback => format!(" {}", "(fallback)".yellow()),
            FileStatus::Failed => format!(" {}", "(not written)".red()),
        };
        log!("html"; "{}: {}{}", file.path, tally_line(file.tally), status);
    }

    let summary = &report.summary;
    log!(
        "done";
        "{}: {}",
        plural_count(summary.documents, "document"),
        tally_line(summary.tally)
    );
    if !summary.removed_names.is_empty() {
        log!(
            "done";
            "{}: {}",
            plural_word(summary.removed_names.len(), "distinct class", "distinct classes"),
            summary.removed_names.join(" ").dimmed()
        );
    }
    if !summary.failed.is_empty() {
        log!("error"; "not written: {}", summary.failed.join(", "));
    }
}

/// Machine-readable report on stdout.
pub fn print_json(report: &RunReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
