//! Unit directory discovery.
//!
//! First stage of the pipeline. The chosen root holds one directory per
//! vehicle; each immediate child is a candidate unit:
//!
//! ```text
//! 2025_11_06_芜湖/                        # root (what the user picks)
//! ├── 2025_11_06_芜湖_1234567_英菲尼迪/   # unit, dated pattern
//! │   ├── 1.jpg
//! │   ├── 2.jpg
//! │   └── ... 29.jpg
//! ├── 2025_11_06_芜湖_7654321_宝马X5/
//! └── .cache/                             # hidden, ignored
//! ```
//!
//! With the prefixed pattern the children are named `1234567_英菲尼迪G37/`
//! instead. Scanning never descends further than one level.
//!
//! ## Failure semantics
//!
//! Only root-level problems are errors: a root that cannot be read, is not a
//! directory, or has no qualifying children. A child that cannot be inspected
//! (a dangling link, a permission error) or whose photos cannot be listed
//! becomes a [`ScanWarning::Unreadable`] and the scan moves on.
//! Name and count validation happen later, in [`crate::plan`].

use crate::collect::{OrderMode, collect_images};
use crate::identifier::{PatternMode, extract_identifier};
use crate::naming::is_hidden_name;
use crate::types::{ScanWarning, UnitDirectory};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("No vehicle folders found in {0}; expected one sub-folder per vehicle")]
    NoUnitDirectories(PathBuf),
}

/// Units discovered under a root, plus problems found along the way.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub units: Vec<UnitDirectory>,
    pub warnings: Vec<ScanWarning>,
}

/// Discover the unit directories under `root`.
///
/// Units are returned in file-name order. Units whose names do not match
/// `pattern` are still returned (with `identifier: None`) so the planner can
/// report them; their photos are not listed.
pub fn scan_units(
    root: &Path,
    pattern: PatternMode,
    order: OrderMode,
) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        if !root.exists() {
            return Err(ScanError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", root.display()),
            )));
        }
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut result = ScanResult::default();
    let mut candidates = 0usize;

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(ScanError::Walk(e)),
            Err(e) => {
                candidates += 1;
                let dir = e.path().unwrap_or(root).to_path_buf();
                tracing::warn!(dir = %dir.display(), error = %e, "cannot inspect entry");
                result.warnings.push(ScanWarning::Unreadable {
                    dir,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if is_hidden_name(&name) {
            continue;
        }
        candidates += 1;

        let path = entry.into_path();
        let identifier = extract_identifier(&name, pattern);
        if identifier.is_none() {
            tracing::debug!(dir = %path.display(), %pattern, "name does not match pattern");
            result.units.push(UnitDirectory {
                path,
                name,
                identifier,
                files: Vec::new(),
            });
            continue;
        }

        match collect_images(&path, order) {
            Ok(files) => result.units.push(UnitDirectory {
                path,
                name,
                identifier,
                files,
            }),
            Err(e) => {
                tracing::warn!(dir = %path.display(), error = %e, "cannot list photos");
                result.warnings.push(ScanWarning::Unreadable {
                    dir: path,
                    message: e.to_string(),
                });
            }
        }
    }

    if candidates == 0 {
        return Err(ScanError::NoUnitDirectories(root.to_path_buf()));
    }

    tracing::info!(
        root = %root.display(),
        units = result.units.len(),
        warnings = result.warnings.len(),
        "scan complete"
    );
    Ok(result)
}
