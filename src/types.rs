//! Shared types passed between the scan, plan, and execute stages.
//!
//! A [`BatchPlan`] is serialized to JSON by `preview --save-plan` and read back
//! by `run --plan`, so everything reachable from it derives `Serialize` and
//! `Deserialize`.

use crate::rules::RuleTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A directory holding one vehicle's photo set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDirectory {
    pub path: PathBuf,
    /// Directory name as found on disk.
    pub name: String,
    /// `None` when the name does not match the configured pattern.
    pub identifier: Option<String>,
    /// JPEG filenames in collector order.
    pub files: Vec<String>,
}

/// Non-fatal problem that keeps a unit (or one of its files) out of the plan.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    #[error("unparseable directory name: {}", dir.display())]
    UnparseableName { dir: PathBuf },
    #[error("{} holds {actual} photos, expected {expected}", dir.display())]
    WrongFileCount {
        dir: PathBuf,
        actual: usize,
        expected: usize,
    },
    #[error("{} and another photo would both become {}", file.display(), destination.display())]
    DuplicateDestination {
        dir: PathBuf,
        file: PathBuf,
        destination: PathBuf,
    },
    #[error("cannot read {}: {message}", dir.display())]
    Unreadable { dir: PathBuf, message: String },
}

impl ScanWarning {
    /// The unit directory the warning is about.
    pub fn dir(&self) -> &std::path::Path {
        match self {
            ScanWarning::UnparseableName { dir }
            | ScanWarning::WrongFileCount { dir, .. }
            | ScanWarning::DuplicateDestination { dir, .. }
            | ScanWarning::Unreadable { dir, .. } => dir,
        }
    }
}

/// Lifecycle of a single plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

/// Why a single entry could not be applied. The batch continues after any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryFailure {
    #[error("source missing: {}", path.display())]
    SourceMissing { path: PathBuf },
    #[error("destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },
    #[error("cannot decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("cannot convert {}: {message}", path.display())]
    Conversion { path: PathBuf, message: String },
    #[error("cannot write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// One planned source → destination transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePlanEntry {
    /// Unit directory both paths live in.
    pub unit: PathBuf,
    /// Position in the unit's collected order (0-based).
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<EntryFailure>,
}

impl FilePlanEntry {
    pub fn new(unit: PathBuf, index: usize, source: PathBuf, destination: PathBuf) -> Self {
        Self {
            unit,
            index,
            source,
            destination,
            status: EntryStatus::Pending,
            failure: None,
        }
    }

    pub(crate) fn mark(&mut self, result: &Result<(), EntryFailure>) {
        match result {
            Ok(()) => {
                self.status = EntryStatus::Succeeded;
                self.failure = None;
            }
            Err(failure) => {
                self.status = EntryStatus::Failed;
                self.failure = Some(failure.clone());
            }
        }
    }
}

/// Ordered entries across all units plus the units that were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub rule: RuleTable,
    pub entries: Vec<FilePlanEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<ScanWarning>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct unit directories with at least one entry.
    pub fn unit_count(&self) -> usize {
        let mut units: Vec<&PathBuf> = self.entries.iter().map(|e| &e.unit).collect();
        units.dedup();
        units.len()
    }
}

/// Result of one executed entry, as reported to progress observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    /// Position of the entry in the plan.
    pub position: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub result: Result<(), EntryFailure>,
}

/// Progress notification emitted after each entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
    pub outcome: EntryOutcome,
}

/// Why a run stopped before reaching the end of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    Cancelled,
    DirectoryVanished(PathBuf),
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::Cancelled => f.write_str("cancelled by user"),
            AbortReason::DirectoryVanished(dir) => {
                write!(f, "unit directory disappeared: {}", dir.display())
            }
        }
    }
}

/// A failed entry with the paths involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub failure: EntryFailure,
}

/// Final, authoritative outcome of an executed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Failures in plan order.
    pub failures: Vec<FailedEntry>,
    /// Entries that were never started (cancellation or abort).
    pub not_started: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<AbortReason>,
    /// Every entry with its final status.
    pub entries: Vec<FilePlanEntry>,
}

impl BatchReport {
    /// Build the report from entries whose statuses have been updated.
    pub fn from_entries(entries: Vec<FilePlanEntry>, aborted: Option<AbortReason>) -> Self {
        let mut report = BatchReport {
            aborted,
            ..Default::default()
        };
        for entry in &entries {
            match entry.status {
                EntryStatus::Succeeded => report.succeeded += 1,
                EntryStatus::Failed => {
                    report.failed += 1;
                    if let Some(failure) = &entry.failure {
                        report.failures.push(FailedEntry {
                            source: entry.source.clone(),
                            destination: entry.destination.clone(),
                            failure: failure.clone(),
                        });
                    }
                }
                EntryStatus::Pending => report.not_started += 1,
            }
        }
        report.entries = entries;
        report
    }

    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.not_started == 0
    }
}
