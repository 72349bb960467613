//! CLI output formatting for preview, progress and the final summary.
//!
//! # Path Display
//!
//! Paths are shown relative to the batch root, as `unit/file`, so a listing
//! reads the same wherever the batch lives. Paths outside the root are shown
//! in full.
//!
//! # Output Format
//!
//! ## Preview
//!
//! ```text
//! 001 2025_1_1_芜湖_1234567_x (29 photos)
//!     2025_1_1_芜湖_1234567_x/1.jpg → 2025_1_1_芜湖_1234567_x/1234567_1_左前45度.jpg
//!     ...
//!
//! Skipped
//!     2025_1_2_芜湖_7654321_y: 28 photos, expected 29
//!     +3 more
//!
//! 29 files pending in 1 unit (standard table)
//! ```
//!
//! With renaming off, photos keep their names: each entry line shows only the
//! photo, and the total reads `29 files pending in 1 unit (normalize in place)`.
//!
//! ## Progress
//!
//! ```text
//! [ 1/29] ok    unit/1.jpg → unit/1234567_1_左前45度.jpg
//! [ 2/29] FAIL  unit/2.jpg: destination already exists: ...
//! ```
//!
//! ## Summary
//!
//! ```text
//! Done: 28 succeeded, 1 failed
//! Failures
//!     unit/2.jpg → unit/1234567_3_右前45度.jpg
//!         destination already exists: ...
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure,
//! with no I/O.

use crate::rules::{RuleTable, parse_suffix};
use crate::types::{BatchPlan, BatchReport, ProgressEvent, ScanWarning};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Show `path` relative to `root` when it lives under it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// `source → destination`, or just `source` when the photo keeps its path.
fn change_line(source: &Path, destination: &Path, root: &Path) -> String {
    if source == destination {
        display_path(source, root)
    } else {
        format!(
            "{} \u{2192} {}",
            display_path(source, root),
            display_path(destination, root)
        )
    }
}

/// One skipped unit or file, relative to the root.
fn warning_line(warning: &ScanWarning, root: &Path) -> String {
    let dir = display_path(warning.dir(), root);
    match warning {
        ScanWarning::UnparseableName { .. } => format!("{}: unparseable directory name", dir),
        ScanWarning::WrongFileCount {
            actual, expected, ..
        } => format!("{}: {} photos, expected {}", dir, actual, expected),
        ScanWarning::DuplicateDestination {
            file, destination, ..
        } => format!(
            "{}: duplicate destination {}",
            display_path(file, root),
            display_path(destination, root)
        ),
        ScanWarning::Unreadable { message, .. } => format!("{}: cannot read ({})", dir, message),
    }
}

/// Keep the first `max` lines and collapse the rest into "+N more".
fn capped(lines: Vec<String>, max: usize, depth: usize) -> Vec<String> {
    let total = lines.len();
    let mut out: Vec<String> = lines
        .into_iter()
        .take(max)
        .map(|l| format!("{}{}", indent(depth), l))
        .collect();
    if total > max {
        out.push(format!("{}+{} more", indent(depth), total - max));
    }
    out
}

// ============================================================================
// Preview
// ============================================================================

/// Format the preview for a plan.
///
/// `rename` is false when the run only normalizes; entries then list the
/// photos that will be rewritten under their current names.
pub fn format_preview(
    plan: &BatchPlan,
    root: &Path,
    max_warnings: usize,
    rename: bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    let mut position = 0;
    let mut current_unit: Option<&Path> = None;
    for entry in &plan.entries {
        if current_unit != Some(entry.unit.as_path()) {
            current_unit = Some(entry.unit.as_path());
            position += 1;
            let count = plan.entries.iter().filter(|e| e.unit == entry.unit).count();
            lines.push(format!(
                "{} {} ({} photos)",
                format_index(position),
                display_path(&entry.unit, root),
                count
            ));
        }
        let line = if rename {
            change_line(&entry.source, &entry.destination, root)
        } else {
            display_path(&entry.source, root)
        };
        lines.push(format!("{}{}", indent(1), line));
    }

    if !plan.skipped.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Skipped".to_string());
        let warnings = plan
            .skipped
            .iter()
            .map(|w| warning_line(w, root))
            .collect();
        lines.extend(capped(warnings, max_warnings, 1));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let action = if rename {
        format!("{} table", plan.rule)
    } else {
        "normalize in place".to_string()
    };
    lines.push(format!(
        "{} pending in {} ({})",
        plural(plan.len(), "file", "files"),
        plural(plan.unit_count(), "unit", "units"),
        action
    ));
    lines
}

pub fn print_preview(plan: &BatchPlan, root: &Path, max_warnings: usize, rename: bool) {
    for line in format_preview(plan, root, max_warnings, rename) {
        println!("{}", line);
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single progress event as one display line.
pub fn format_progress_event(event: &ProgressEvent, root: &Path) -> Vec<String> {
    let width = event.total.to_string().len();
    let counter = format!("[{:>w$}/{}]", event.completed, event.total, w = width);
    let outcome = &event.outcome;
    let line = match &outcome.result {
        Ok(()) => format!(
            "{} ok    {}",
            counter,
            change_line(&outcome.source, &outcome.destination, root)
        ),
        Err(failure) => format!(
            "{} FAIL  {}: {}",
            counter,
            display_path(&outcome.source, root),
            failure
        ),
    };
    vec![line]
}

// ============================================================================
// Summary
// ============================================================================

/// Format the completion summary.
pub fn format_report(report: &BatchReport, root: &Path, max_failures: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Done: {} succeeded, {} failed",
        report.succeeded, report.failed
    )];

    if let Some(reason) = &report.aborted {
        lines.push(format!(
            "Stopped early: {} ({} not started)",
            reason, report.not_started
        ));
    }

    if !report.failures.is_empty() {
        lines.push("Failures".to_string());
        for failed in report.failures.iter().take(max_failures) {
            lines.push(format!(
                "{}{}",
                indent(1),
                change_line(&failed.source, &failed.destination, root)
            ));
            lines.push(format!("{}{}", indent(2), failed.failure));
        }
        if report.failures.len() > max_failures {
            lines.push(format!(
                "{}+{} more",
                indent(1),
                report.failures.len() - max_failures
            ));
        }
    }
    lines
}

pub fn print_report(report: &BatchReport, root: &Path, max_failures: usize) {
    for line in format_report(report, root, max_failures) {
        println!("{}", line);
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Format a rename table, one shot per line in assignment order.
///
/// ```text
/// standard table (29 shots)
/// 001 #1  左前45度  _1_左前45度.jpg
/// ```
pub fn format_rules(rule: RuleTable) -> Vec<String> {
    let mut lines = vec![format!("{} table ({} shots)", rule, rule.len())];
    for (i, suffix) in rule.suffixes().iter().enumerate() {
        let line = match parse_suffix(suffix) {
            Some((number, label)) => format!(
                "{} #{:<3} {}  {}",
                format_index(i + 1),
                number,
                label,
                suffix
            ),
            None => format!("{} {}", format_index(i + 1), suffix),
        };
        lines.push(line);
    }
    lines
}

pub fn print_rules(rule: RuleTable) {
    for line in format_rules(rule) {
        println!("{}", line);
    }
}
