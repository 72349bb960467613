//! Batch execution: applies a [`BatchPlan`] to the filesystem.
//!
//! Every entry goes through the same check-then-act sequence against live
//! filesystem state, immediately before acting on it:
//!
//! | Mode | Checks | Action |
//! |---|---|---|
//! | rename only | source present, destination free | `fs::rename` |
//! | rename + normalize | source present, destination free | normalize into destination, then remove source |
//! | normalize only | source present | normalize into a temp file, then replace source |
//! | neither | none | [`ValidationError::NothingToDo`] before any entry runs |
//!
//! Per-entry problems are recorded as [`EntryFailure`]s and the batch moves on.
//! Only a precondition failure ([`ValidationError`]) stops a run before it
//! starts. A unit directory disappearing mid-run, or a cancellation request,
//! stops it before the next entry; entries already applied stay applied.
//!
//! ## Parallel Processing
//!
//! With more than one worker, entries are grouped by unit directory and the
//! groups run on a [rayon](https://docs.rs/rayon) pool. Entries inside a
//! group stay strictly sequential, so no two writers ever touch one directory.
//! The report lists entries in plan order however they were scheduled.

use crate::config::{NormalizationConfig, ToolConfig, effective_threads};
use crate::imaging::{BackendError, ImageBackend, NormalizeConfig, normalize_file};
use crate::types::{
    AbortReason, BatchPlan, BatchReport, EntryFailure, EntryOutcome, FilePlanEntry,
    ProgressEvent,
};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use thiserror::Error;

/// A plan or configuration that must not be executed at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("neither rename nor normalize is enabled, nothing to do")]
    NothingToDo,
    #[error("invalid normalization settings: {0}")]
    InvalidConfig(String),
    #[error("{} is the destination of more than one entry", .0.display())]
    DuplicateDestination(PathBuf),
}

/// What the executor does with each entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteConfig {
    pub rename_enabled: bool,
    pub normalization: NormalizationConfig,
    /// Unit directories processed at once. 1 means strictly sequential.
    pub workers: usize,
}

impl ExecuteConfig {
    pub fn from_tool_config(config: &ToolConfig) -> Self {
        Self {
            rename_enabled: config.rename.enabled,
            normalization: config.normalize.clone(),
            workers: effective_threads(&config.processing),
        }
    }
}

impl Default for ExecuteConfig {
    fn default() -> Self {
        Self::from_tool_config(&ToolConfig::default())
    }
}

/// Shared flag asking a running batch to stop before its next entry.
///
/// Cloning shares the flag. An entry already in progress always finishes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    RenameOnly,
    NormalizeOnly(NormalizeConfig),
    RenameAndNormalize(NormalizeConfig),
}

/// Check that `plan` can run under `config`.
///
/// Nothing on disk is touched. `execute` calls this first; callers can also
/// use it to reject a saved plan before asking for confirmation.
pub fn validate(plan: &BatchPlan, config: &ExecuteConfig) -> Result<(), ValidationError> {
    select_mode(plan, config).map(|_| ())
}

fn select_mode(plan: &BatchPlan, config: &ExecuteConfig) -> Result<Mode, ValidationError> {
    let normalization = &config.normalization;
    if !config.rename_enabled && !normalization.enabled {
        return Err(ValidationError::NothingToDo);
    }
    if normalization.enabled {
        if normalization.width == 0 || normalization.height == 0 {
            return Err(ValidationError::InvalidConfig(format!(
                "canvas {}x{} must be non-zero",
                normalization.width, normalization.height
            )));
        }
        if !(1..=100).contains(&normalization.quality) {
            return Err(ValidationError::InvalidConfig(format!(
                "quality {} must be 1-100",
                normalization.quality
            )));
        }
    }
    if config.rename_enabled {
        let mut seen: HashSet<&Path> = HashSet::new();
        for entry in &plan.entries {
            if !seen.insert(&entry.destination) {
                return Err(ValidationError::DuplicateDestination(
                    entry.destination.clone(),
                ));
            }
        }
    }

    let normalize = normalization.to_normalize_config();
    Ok(match (config.rename_enabled, normalization.enabled) {
        (true, false) => Mode::RenameOnly,
        (false, _) => Mode::NormalizeOnly(normalize),
        (true, true) => Mode::RenameAndNormalize(normalize),
    })
}

/// Map a backend error onto the entry that caused it.
fn entry_failure(err: BackendError, source: &Path, output: &Path) -> EntryFailure {
    match err {
        BackendError::Decode(message) => EntryFailure::Decode {
            path: source.to_path_buf(),
            message,
        },
        BackendError::Conversion(message) => EntryFailure::Conversion {
            path: source.to_path_buf(),
            message,
        },
        BackendError::Write(message) => EntryFailure::Write {
            path: output.to_path_buf(),
            message,
        },
        BackendError::Io(e) => EntryFailure::Write {
            path: output.to_path_buf(),
            message: e.to_string(),
        },
        BackendError::OutputExists(path) => EntryFailure::DestinationExists { path },
    }
}

/// Apply one entry. Checks run against the filesystem right before acting.
fn apply_entry(
    entry: &FilePlanEntry,
    mode: Mode,
    backend: &impl ImageBackend,
) -> Result<(), EntryFailure> {
    if !entry.source.exists() {
        return Err(EntryFailure::SourceMissing {
            path: entry.source.clone(),
        });
    }

    match mode {
        Mode::RenameOnly => {
            if entry.destination.exists() {
                return Err(EntryFailure::DestinationExists {
                    path: entry.destination.clone(),
                });
            }
            std::fs::rename(&entry.source, &entry.destination).map_err(|e| {
                EntryFailure::Write {
                    path: entry.destination.clone(),
                    message: e.to_string(),
                }
            })
        }
        Mode::RenameAndNormalize(normalize) => {
            if entry.destination.exists() {
                return Err(EntryFailure::DestinationExists {
                    path: entry.destination.clone(),
                });
            }
            normalize_file(backend, &entry.source, &entry.destination, &normalize, false)
                .map_err(|e| entry_failure(e, &entry.source, &entry.destination))?;
            std::fs::remove_file(&entry.source).map_err(|e| EntryFailure::Write {
                path: entry.source.clone(),
                message: format!("normalized copy written but source not removed: {e}"),
            })
        }
        Mode::NormalizeOnly(normalize) => {
            normalize_file(backend, &entry.source, &entry.source, &normalize, true)
                .map(|_| ())
                .map_err(|e| entry_failure(e, &entry.source, &entry.source))
        }
    }
}

/// State shared by every group of a running batch.
struct RunState<'a> {
    total: usize,
    completed: AtomicUsize,
    aborted: Mutex<Option<AbortReason>>,
    cancel: Option<&'a CancelToken>,
    events: Option<Sender<ProgressEvent>>,
}

impl RunState<'_> {
    fn abort(&self, reason: AbortReason) {
        if let Ok(mut aborted) = self.aborted.lock() {
            aborted.get_or_insert(reason);
        }
    }

    /// True once the run must not start another entry.
    fn should_stop(&self) -> bool {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            self.abort(AbortReason::Cancelled);
        }
        self.aborted.lock().map(|a| a.is_some()).unwrap_or(true)
    }

    fn report(&self, outcome: EntryOutcome) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref tx) = self.events {
            // A gone receiver only means nobody is watching.
            let _ = tx.send(ProgressEvent {
                completed,
                total: self.total,
                outcome,
            });
        }
    }

    fn into_abort_reason(self) -> Option<AbortReason> {
        self.aborted.into_inner().ok().flatten()
    }
}

type Group = Vec<(usize, FilePlanEntry)>;

/// Run one group of entries strictly in order.
fn run_group(
    mut group: Group,
    mode: Mode,
    backend: &impl ImageBackend,
    state: &RunState<'_>,
) -> Group {
    for (position, entry) in group.iter_mut() {
        if state.should_stop() {
            break;
        }
        if !entry.unit.is_dir() {
            tracing::warn!(dir = %entry.unit.display(), "unit directory vanished, stopping");
            state.abort(AbortReason::DirectoryVanished(entry.unit.clone()));
            break;
        }

        let result = apply_entry(entry, mode, backend);
        match &result {
            Ok(()) => tracing::debug!(
                source = %entry.source.display(),
                destination = %entry.destination.display(),
                "applied"
            ),
            Err(failure) => tracing::warn!(%failure, "entry failed"),
        }
        entry.mark(&result);
        state.report(EntryOutcome {
            position: *position,
            source: entry.source.clone(),
            destination: entry.destination.clone(),
            result,
        });
    }
    group
}

/// Split entries into per-unit groups, in order of first appearance.
fn group_by_unit(entries: Vec<FilePlanEntry>) -> Vec<Group> {
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for (position, entry) in entries.into_iter().enumerate() {
        let slot = *index.entry(entry.unit.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push((position, entry));
    }
    groups
}

fn run_parallel(
    groups: Vec<Group>,
    workers: usize,
    mode: Mode,
    backend: &impl ImageBackend,
    state: &RunState<'_>,
) -> Vec<Group> {
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| {
            groups
                .into_par_iter()
                .map(|group| run_group(group, mode, backend, state))
                .collect()
        }),
        Err(e) => {
            tracing::warn!(error = %e, "thread pool unavailable, running sequentially");
            groups
                .into_iter()
                .map(|group| run_group(group, mode, backend, state))
                .collect()
        }
    }
}

/// Execute `plan` and return the final report.
///
/// Progress events, when a sender is given, arrive after each entry. They are
/// advisory; the returned report is authoritative. Returns `Err` only when
/// the plan fails [`validate`], in which case nothing was touched.
///
/// With renaming disabled, photos keep their names, so every entry's
/// destination is reported as its source.
pub fn execute(
    mut plan: BatchPlan,
    config: &ExecuteConfig,
    backend: &impl ImageBackend,
    events: Option<Sender<ProgressEvent>>,
    cancel: Option<&CancelToken>,
) -> Result<BatchReport, ValidationError> {
    let mode = select_mode(&plan, config)?;
    if let Mode::NormalizeOnly(_) = mode {
        for entry in &mut plan.entries {
            entry.destination = entry.source.clone();
        }
    }
    let total = plan.entries.len();
    tracing::info!(
        entries = total,
        units = plan.unit_count(),
        workers = config.workers,
        ?mode,
        "starting batch"
    );

    let state = RunState {
        total,
        completed: AtomicUsize::new(0),
        aborted: Mutex::new(None),
        cancel,
        events,
    };

    let groups = if config.workers > 1 {
        run_parallel(
            group_by_unit(plan.entries),
            config.workers,
            mode,
            backend,
            &state,
        )
    } else {
        let all: Group = plan.entries.into_iter().enumerate().collect();
        vec![run_group(all, mode, backend, &state)]
    };

    let mut entries: Group = groups.into_iter().flatten().collect();
    entries.sort_by_key(|(position, _)| *position);
    let entries = entries.into_iter().map(|(_, entry)| entry).collect();

    let report = BatchReport::from_entries(entries, state.into_abort_reason());
    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        not_started = report.not_started,
        aborted = ?report.aborted,
        "batch finished"
    );
    Ok(report)
}

/// Run [`execute`] on a background thread.
///
/// The caller keeps its own thread free to drain progress events and to
/// cancel through `cancel`.
pub fn spawn_execute<B>(
    plan: BatchPlan,
    config: ExecuteConfig,
    backend: B,
    events: Option<Sender<ProgressEvent>>,
    cancel: Option<CancelToken>,
) -> JoinHandle<Result<BatchReport, ValidationError>>
where
    B: ImageBackend + Send + 'static,
{
    std::thread::spawn(move || execute(plan, &config, &backend, events, cancel.as_ref()))
}
