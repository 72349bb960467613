//! Rename planning: pairs each unit's photos with the rule table.
//!
//! Pairing is strictly positional. The k-th photo in collector order gets the
//! k-th suffix of the table, so the capture order on the camera decides which
//! shot label a photo receives. Nothing looks at image content.
//!
//! A unit contributes entries only when it is fully usable:
//!
//! | Unit state | Result |
//! |---|---|
//! | name did not match the pattern | skipped, [`ScanWarning::UnparseableName`] |
//! | photo count ≠ table length | skipped, [`ScanWarning::WrongFileCount`] with the actual count |
//! | two photos map to one destination | that photo skipped, [`ScanWarning::DuplicateDestination`] |
//! | otherwise | one entry per photo |

use crate::rules::RuleTable;
use crate::types::{BatchPlan, FilePlanEntry, ScanWarning, UnitDirectory};
use std::collections::HashSet;
use std::path::PathBuf;

/// Build the rename plan for `units` against `rule`.
pub fn build_plan(units: &[UnitDirectory], rule: RuleTable) -> BatchPlan {
    let mut plan = BatchPlan {
        rule,
        ..Default::default()
    };

    for unit in units {
        let Some(identifier) = unit.identifier.as_deref() else {
            plan.skipped.push(ScanWarning::UnparseableName {
                dir: unit.path.clone(),
            });
            continue;
        };

        if unit.files.len() != rule.len() {
            tracing::warn!(
                dir = %unit.path.display(),
                actual = unit.files.len(),
                expected = rule.len(),
                "wrong photo count"
            );
            plan.skipped.push(ScanWarning::WrongFileCount {
                dir: unit.path.clone(),
                actual: unit.files.len(),
                expected: rule.len(),
            });
            continue;
        }

        let mut destinations: HashSet<PathBuf> = HashSet::new();
        for (index, file) in unit.files.iter().enumerate() {
            let Some(new_name) = rule.file_name(identifier, index) else {
                break;
            };
            let source = unit.path.join(file);
            let destination = unit.path.join(new_name);
            if !destinations.insert(destination.clone()) {
                plan.skipped.push(ScanWarning::DuplicateDestination {
                    dir: unit.path.clone(),
                    file: source,
                    destination,
                });
                continue;
            }
            plan.entries.push(FilePlanEntry::new(
                unit.path.clone(),
                index,
                source,
                destination,
            ));
        }
    }

    tracing::info!(
        entries = plan.entries.len(),
        units = plan.unit_count(),
        skipped = plan.skipped.len(),
        rule = %rule,
        "plan built"
    );
    plan
}
