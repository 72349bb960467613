//! # shotlist
//!
//! Batch renaming and normalization for vehicle inspection photos.
//!
//! Each vehicle's photos live in one *unit directory* whose name carries the
//! vehicle identifier. A unit holds exactly one photo per shot of a fixed
//! 29-shot checklist, taken in checklist order. shotlist renames every photo
//! to `{identifier}_{n}_{label}.jpg` and can re-encode it onto a uniform
//! white canvas at a fixed JPEG quality.
//!
//! # Architecture: Three Stages
//!
//! ```text
//! 1. Scan      root/      →  units            (directories → identifiers + ordered photos)
//! 2. Plan      units      →  BatchPlan        (positional pairing with a rule table)
//! 3. Execute   BatchPlan  →  BatchReport      (rename / normalize, per-entry outcome)
//! ```
//!
//! Scan and plan never touch file contents, so a plan can be previewed, saved
//! as JSON, and executed later. Execution re-checks the filesystem right
//! before each entry, so a stale plan fails entry by entry instead of
//! overwriting anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`identifier`] | Reads the vehicle identifier out of a unit directory name |
//! | [`naming`] | Natural-numeric filename ordering, JPEG and hidden-file filters |
//! | [`collect`] | Lists and orders the photos in one directory |
//! | [`scan`] | Stage 1: finds unit directories under a root |
//! | [`rules`] | The two 29-shot rename tables |
//! | [`plan`] | Stage 2: pairs photos with table suffixes, skipping unusable units |
//! | [`execute`] | Stage 3: applies a plan, with progress events and cancellation |
//! | [`imaging`] | Pure-Rust decode, orientation, fit-and-letterbox, JPEG encode |
//! | [`config`] | Layered `shotlist.toml` loading, validation, merging |
//! | [`types`] | Data passed between stages (`UnitDirectory`, `BatchPlan`, `BatchReport`) |
//! | [`output`] | CLI output formatting for preview, progress and summary |
//!
//! # Design Decisions
//!
//! ## Positional Pairing
//!
//! The k-th photo in collector order always receives the k-th suffix of the
//! table. Nothing inspects image content. Natural-numeric ordering is the
//! default so `2.jpg` sorts before `10.jpg`; lexicographic ordering remains
//! available for cameras that zero-pad.
//!
//! ## Whole Units or Nothing
//!
//! A unit whose photo count differs from the table length contributes no
//! entries at all. Truncating or padding would shift every label after the
//! missing shot.
//!
//! ## Never Half-Written
//!
//! Normalized output is encoded into a temporary file in the destination
//! directory and then renamed into place. A failed or interrupted encode
//! leaves the original photo untouched.

pub mod collect;
pub mod config;
pub mod execute;
pub mod identifier;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod plan;
pub mod rules;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
