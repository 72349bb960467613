//! Tool configuration module.
//!
//! Handles loading, validating, and merging `shotlist.toml`. Configuration is
//! layered: stock defaults are overridden by a `shotlist.toml` in the batch
//! root (or a file named with `--config`), which is in turn overridden by
//! command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scan]
//! pattern = "dated"         # "dated" or "prefixed" unit directory names
//! order = "natural"         # "natural" or "lexicographic" photo order
//!
//! [rules]
//! table = "standard"        # "standard" or "alternate" rename table
//!
//! [rename]
//! enabled = true
//!
//! [normalize]
//! enabled = false
//! width = 1800              # Canvas width in pixels
//! height = 1800             # Canvas height in pixels
//! quality = 85              # JPEG quality (1-100)
//! correct_orientation = true
//!
//! [processing]
//! max_processes = 4         # Omit to process strictly one file at a time
//!
//! [report]
//! max_listed_failures = 10
//! max_listed_warnings = 5
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [normalize]
//! enabled = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::collect::OrderMode;
use crate::identifier::PatternMode;
use crate::imaging::{Canvas, NormalizeConfig, Quality};
use crate::rules::RuleTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the batch root.
pub const CONFIG_FILE_NAME: &str = "shotlist.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `shotlist.toml`.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// How unit directories and their photos are recognized and ordered.
    pub scan: ScanConfig,
    /// Which rename table maps collected photos to new names.
    pub rules: RulesConfig,
    pub rename: RenameConfig,
    /// Canvas, quality and orientation settings for normalization.
    pub normalize: NormalizationConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Limits on how much detail the summary prints.
    pub report: ReportConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalize.width == 0 || self.normalize.height == 0 {
            return Err(ConfigError::Validation(
                "normalize.width and normalize.height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.normalize.quality) {
            return Err(ConfigError::Validation(
                "normalize.quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub pattern: PatternMode,
    pub order: OrderMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub table: RuleTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameConfig {
    pub enabled: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Image normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationConfig {
    pub enabled: bool,
    /// Output canvas width in pixels.
    pub width: u32,
    /// Output canvas height in pixels.
    pub height: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Rotate according to the EXIF orientation tag before fitting.
    pub correct_orientation: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 1800,
            height: 1800,
            quality: 85,
            correct_orientation: true,
        }
    }
}

impl NormalizationConfig {
    /// The per-photo settings handed to the imaging layer.
    pub fn to_normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            canvas: Canvas::new(self.width, self.height),
            quality: Quality::new(self.quality),
            correct_orientation: self.correct_orientation,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of unit directories processed at once.
    /// When absent, entries run strictly one after another.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → 1, sequential
/// - `Some(n)` → `min(n, cores)`, never below 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.min(cores).max(1))
        .unwrap_or(1)
}

/// Summary verbosity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Failure details listed before collapsing into "+N more".
    pub max_listed_failures: usize,
    /// Skipped-directory warnings listed in a preview.
    pub max_listed_warnings: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_listed_failures: 10,
            max_listed_warnings: 5,
        }
    }
}

pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ToolConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn read_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Load `shotlist.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `shotlist.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    read_config_file(&config_path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config for a batch rooted at `root`.
///
/// `explicit` names a config file that replaces the root's `shotlist.toml`;
/// it must exist. `flags` is the command-line overlay, applied last.
pub fn load_config(
    root: &Path,
    explicit: Option<&Path>,
    flags: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let file = match explicit {
        Some(path) => Some(read_config_file(path)?),
        None => load_raw_config(root)?,
    };
    let base = match file {
        Some(file) => merge_toml(stock_defaults_value(), file),
        None => stock_defaults_value(),
    };
    resolve_config(base, flags)
}

/// Returns a fully-commented stock `shotlist.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# shotlist configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as shotlist.toml in the batch root, or pass it with
# --config. Command-line flags override values set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# How the vehicle identifier is read from a unit directory name.
#   "dated"    -> YYYY_M_D_<label>_<digits>_...   (e.g. 2025_3_14_A_1234567_x)
#   "prefixed" -> <digits>_...                     (e.g. 1234567_x)
pattern = "dated"

# Order in which photos are matched against the rename table.
#   "natural"       -> 2.jpg before 10.jpg
#   "lexicographic" -> plain code-point order, 10.jpg before 2.jpg
order = "natural"

# ---------------------------------------------------------------------------
# Rename rules
# ---------------------------------------------------------------------------
[rules]
# Which 29-shot table assigns new names. Run `shotlist rules` to list one.
table = "standard"

# ---------------------------------------------------------------------------
# Rename
# ---------------------------------------------------------------------------
[rename]
# Give each photo its table name. When false, photos keep their names.
enabled = true

# ---------------------------------------------------------------------------
# Normalize
# ---------------------------------------------------------------------------
[normalize]
# Re-encode every photo onto a fixed white canvas.
enabled = false

# Canvas size in pixels. Photos are scaled down to fit, never up.
width = 1800
height = 1800

# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# Rotate photos upright according to their EXIF orientation tag.
correct_orientation = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum unit directories processed in parallel.
# Omit or comment out to process one file at a time.
# max_processes = 4

# ---------------------------------------------------------------------------
# Report
# ---------------------------------------------------------------------------
[report]
# Failure details listed in the summary before "+N more".
max_listed_failures = 10

# Skipped-directory warnings listed in a preview before "+N more".
max_listed_warnings = 5
"##
}
