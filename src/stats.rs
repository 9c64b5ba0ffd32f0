//! Removal statistics.
//!
//! [`ClassStats`] is the accumulator shared by both scopes: one per document
//! while it is rewritten, and one for the whole run that absorbs every
//! document's stats. Each token occurrence lands in exactly one of
//! `removed`/`kept`, so `all == removed + kept` always holds.

use serde::Serialize;
use std::collections::BTreeSet;

/// Removed/kept/all counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub removed: usize,
    pub kept: usize,
    pub all: usize,
}

impl Tally {
    fn add(&mut self, other: Tally) {
        self.removed += other.removed;
        self.kept += other.kept;
        self.all += other.all;
    }
}

/// Mutable counts plus the distinct removed names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStats {
    tally: Tally,
    removed_names: BTreeSet<String>,
}

impl ClassStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one element: how many tokens survived and which were dropped.
    pub fn record_element<S: AsRef<str>>(&mut self, kept: usize, removed: &[S]) {
        self.tally.add(Tally {
            removed: removed.len(),
            kept,
            all: kept + removed.len(),
        });
        self.removed_names
            .extend(removed.iter().map(|name| name.as_ref().to_owned()));
    }

    /// Fold another accumulator (usually one document) into this one.
    pub fn merge(&mut self, other: &ClassStats) {
        self.tally.add(other.tally);
        self.removed_names
            .extend(other.removed_names.iter().cloned());
    }

    pub const fn tally(&self) -> Tally {
        self.tally
    }

    pub const fn removed_names(&self) -> &BTreeSet<String> {
        &self.removed_names
    }
}

// ============================================================================
// Run scope
// ============================================================================

/// Run-level accumulator. Created at run start, finalized once at the end.
#[derive(Debug, Default)]
pub struct RunStats {
    classes: ClassStats,
    documents: usize,
    failed: Vec<String>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one processed document.
    pub fn add_document(&mut self, stats: &ClassStats) {
        self.documents += 1;
        self.classes.merge(stats);
    }

    /// Record a document whose output could not be produced. It counts as a
    /// processed document with zero tokens.
    pub fn add_failure(&mut self, id: impl Into<String>) {
        self.documents += 1;
        self.failed.push(id.into());
    }

    pub fn finalize(self) -> RunSummary {
        RunSummary {
            documents: self.documents,
            tally: self.classes.tally,
            removed_names: self.classes.removed_names.into_iter().collect(),
            failed: self.failed,
        }
    }
}

/// Immutable end-of-run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub documents: usize,
    #[serde(flatten)]
    pub tally: Tally,
    /// Distinct removed names across the run, sorted.
    pub removed_names: Vec<String>,
    /// Documents whose output could not be written anywhere.
    pub failed: Vec<String>,
}
