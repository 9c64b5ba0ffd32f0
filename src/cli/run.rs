//! One complete run: read inputs, rewrite in parallel, write, summarize.

use std::fs;
use std::io;

use anyhow::{Context, Result};

use super::collect::{self, HtmlInput};
use super::report::{FileReport, FileStatus, RunReport};
use crate::config::DeclassConfig;
use crate::engine::{Document, DocumentIssue, Engine};
use crate::logger::ProgressLine;
use crate::output::{self, Destinations, WriteOutcome};
use crate::rewrite::RewriteOutcome;
use crate::stats::{ClassStats, RunStats, Tally};
use crate::utils::plural::{plural_count, plural_word};
use crate::{debug, log};

/// An HTML input as read from disk.
enum Loaded {
    /// Handed to the engine; outcomes come back in the same order.
    Text,
    /// Not valid UTF-8. Passed through byte for byte, never rewritten.
    Raw { bytes: Vec<u8>, reason: String },
}

/// Execute the run described by `config`.
///
/// Errors are fatal (configuration, stylesheet parsing, unreadable inputs).
/// Per-document problems are logged and reflected in the report instead.
pub fn run(config: &DeclassConfig) -> Result<RunReport> {
    let sources = collect::read_stylesheets(&config.stylesheet.files)?;
    let engine = Engine::build(&sources, &config.engine_settings())?;
    for warning in engine.warnings() {
        log!("warning"; "{warning}");
    }
    log!(
        "css";
        "{} from {}, {} allowed",
        plural_word(engine.harvested(), "class", "classes"),
        plural_count(sources.len(), "stylesheet"),
        engine.allowed()
    );

    let inputs = collect::collect_html(&config.markup.files, &config.root);
    let (loaded, documents) = read_documents(&inputs)?;

    let progress = ProgressLine::new("rewrite", documents.len());
    let mut outcomes = engine
        .rewrite_each(&documents, |_| progress.inc())
        .into_iter();
    progress.finish();
    debug!("html"; "{} distinct class tokens classified", engine.classified());

    let mut run = RunStats::new();
    let mut destinations = Destinations::new();
    let mut files = Vec::with_capacity(inputs.len());

    for (input, loaded) in inputs.iter().zip(loaded) {
        let id = input.path.display().to_string();
        let file = match loaded {
            Loaded::Text => {
                let Some(outcome) = outcomes.next() else {
                    break;
                };
                let content = outcome.html.as_bytes();
                finish_document(config, input, &id, content, &outcome, &mut destinations, &mut run)
            }
            Loaded::Raw { bytes, reason } => {
                let outcome = RewriteOutcome {
                    html: String::new(),
                    stats: ClassStats::new(),
                    removals: Vec::new(),
                    degraded: Some(reason),
                };
                finish_document(config, input, &id, &bytes, &outcome, &mut destinations, &mut run)
            }
        };
        files.push(file);
    }

    Ok(RunReport {
        harvested: engine.harvested(),
        allowed: engine.allowed(),
        files,
        summary: run.finalize(),
    })
}

/// Read every input. Text documents go to the engine; undecodable ones are
/// kept aside as raw bytes.
fn read_documents(inputs: &[HtmlInput]) -> Result<(Vec<Loaded>, Vec<Document>)> {
    let mut loaded = Vec::with_capacity(inputs.len());
    let mut documents = Vec::with_capacity(inputs.len());

    for input in inputs {
        let bytes = fs::read(&input.path)
            .with_context(|| format!("Failed to read {}", input.path.display()))?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                loaded.push(Loaded::Text);
                documents.push(Document::new(input.path.display().to_string(), text));
            }
            Err(err) => {
                let reason = format!("not valid UTF-8: {}", err.utf8_error());
                loaded.push(Loaded::Raw {
                    bytes: err.into_bytes(),
                    reason,
                });
            }
        }
    }

    Ok((loaded, documents))
}

/// Log, write and account for one rewritten document.
fn finish_document(
    config: &DeclassConfig,
    input: &HtmlInput,
    id: &str,
    content: &[u8],
    outcome: &RewriteOutcome,
    destinations: &mut Destinations,
    run: &mut RunStats,
) -> FileReport {
    let degraded = outcome.degraded.is_some();
    if let Some(reason) = &outcome.degraded {
        let issue = DocumentIssue::Degraded {
            id: id.to_owned(),
            reason: reason.clone(),
        };
        log!("warning"; "{issue}");
    }

    for record in &outcome.removals {
        debug!(
            "html";
            "{}: <{}> {} -> removed {}",
            id,
            record.tag,
            record.original.join(" "),
            record.removed.join(" ")
        );
    }

    let report = |status, tally| FileReport {
        path: id.to_owned(),
        status,
        degraded,
        tally,
    };

    if config.output.dry_run {
        run.add_document(&outcome.stats);
        return report(FileStatus::DryRun, outcome.stats.tally());
    }

    let intended = output::destination(&input.path, &input.relative, config.output.dir.as_deref());
    let suffix = &config.output.fallback_suffix;
    let written = if destinations.claim(&intended) {
        output::write_with_fallback(&input.path, &intended, content, suffix)
    } else {
        let taken = io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already used by another document",
        );
        output::write_fallback(&input.path, &intended, content, suffix, taken)
    };

    match written {
        WriteOutcome::Written(_) => {
            run.add_document(&outcome.stats);
            report(FileStatus::Written, outcome.stats.tally())
        }
        WriteOutcome::Fallback {
            intended,
            written,
            error,
        } => {
            let issue = DocumentIssue::WriteFallback {
                id: id.to_owned(),
                intended,
                written,
                error,
            };
            log!("warning"; "{issue}");
            run.add_document(&outcome.stats);
            report(FileStatus::Fallback, outcome.stats.tally())
        }
        WriteOutcome::Failed {
            intended,
            fallback,
            error,
        } => {
            let issue = DocumentIssue::WriteFailed {
                id: id.to_owned(),
                intended,
                fallback,
                error,
            };
            log!("error"; "{issue}");
            run.add_failure(id.to_owned());
            report(FileStatus::Failed, Tally::default())
        }
    }
}
