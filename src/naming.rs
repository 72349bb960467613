//! Centralized filename parsing for photo ordering.
//!
//! Camera exports and phone dumps name files with embedded counters
//! (`1.jpg`, `IMG_0012.jpg`, `photo 10.JPG`). Sorting those names as plain
//! strings gives the classic `1, 10, 2` misordering, so this module splits a
//! name into alternating text and digit runs that compare the way a person
//! reads them:
//!
//! - `"IMG_12.jpg"` → `[Text("img_"), Number(12), Text(".jpg")]`
//! - `"10.jpg"` → `[Number(10), Text(".jpg")]`
//!
//! Text runs are lowercase-folded, digit runs compare as integers.

use std::cmp::Ordering;

/// One run of a tokenized filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRun {
    /// Lowercase-folded non-digit characters.
    Text(String),
    /// A run of ASCII digits. `digits` keeps the original spelling so that
    /// `"007"` and `"7"` stay distinguishable after the numeric comparison.
    Number { value: u128, digits: String },
}

impl NameRun {
    fn rank(&self) -> u8 {
        // Digits sort before letters, as they do in ASCII.
        match self {
            NameRun::Number { .. } => 0,
            NameRun::Text(_) => 1,
        }
    }
}

impl Ord for NameRun {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                NameRun::Number {
                    value: a,
                    digits: da,
                },
                NameRun::Number {
                    value: b,
                    digits: db,
                },
            ) => a.cmp(b).then_with(|| da.len().cmp(&db.len())),
            (NameRun::Text(a), NameRun::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for NameRun {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a filename into alternating text and digit runs.
pub fn split_runs(name: &str) -> Vec<NameRun> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in name.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            runs.push(finish_run(std::mem::take(&mut current), in_digits));
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        runs.push(finish_run(current, in_digits));
    }
    runs
}

fn finish_run(raw: String, digits: bool) -> NameRun {
    if digits {
        // Runs longer than u128 can hold saturate; the digit string still
        // breaks ties between them.
        let value = raw.parse::<u128>().unwrap_or(u128::MAX);
        NameRun::Number { value, digits: raw }
    } else {
        NameRun::Text(raw.to_lowercase())
    }
}

/// Compare two filenames in natural-numeric order.
///
/// Falls back to plain string comparison when the run sequences are equal,
/// so the ordering is total and deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    split_runs(a).cmp(&split_runs(b)).then_with(|| a.cmp(b))
}

/// True for `.jpg` / `.jpeg` in any letter case.
pub fn is_jpeg_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

/// Dot-files are never photos (`.DS_Store`, `._1.jpg` resource forks).
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn split_number_then_extension() {
        assert_eq!(
            split_runs("10.jpg"),
            vec![
                NameRun::Number {
                    value: 10,
                    digits: "10".into()
                },
                NameRun::Text(".jpg".into()),
            ]
        );
    }

    #[test]
    fn split_folds_text_case() {
        let runs = split_runs("IMG_7.JPG");
        assert_eq!(runs[0], NameRun::Text("img_".into()));
        assert_eq!(runs[2], NameRun::Text(".jpg".into()));
    }

    #[test]
    fn split_empty_name() {
        assert!(split_runs("").is_empty());
    }

    #[test]
    fn numeric_names_sort_numerically() {
        assert_eq!(
            sorted(&["10.jpg", "2.jpg", "1.jpg"]),
            vec!["1.jpg", "2.jpg", "10.jpg"]
        );
    }

    #[test]
    fn prefixed_counters_sort_numerically() {
        assert_eq!(
            sorted(&["IMG_100.jpg", "IMG_9.jpg", "IMG_10.jpg"]),
            vec!["IMG_9.jpg", "IMG_10.jpg", "IMG_100.jpg"]
        );
    }

    #[test]
    fn text_comparison_ignores_case() {
        assert_eq!(
            sorted(&["b.jpg", "A.jpg", "c.jpg"]),
            vec!["A.jpg", "b.jpg", "c.jpg"]
        );
    }

    #[test]
    fn leading_zeros_are_ordered_but_distinct() {
        assert_eq!(natural_cmp("7.jpg", "007.jpg"), Ordering::Less);
        assert_eq!(natural_cmp("007.jpg", "8.jpg"), Ordering::Less);
    }

    #[test]
    fn huge_digit_runs_do_not_panic() {
        let big = "9".repeat(60);
        assert_eq!(
            natural_cmp(&format!("{big}.jpg"), "1.jpg"),
            Ordering::Greater
        );
    }

    #[test]
    fn jpeg_extension_any_case() {
        assert!(is_jpeg_name("a.jpg"));
        assert!(is_jpeg_name("a.JPEG"));
        assert!(is_jpeg_name("a.JpG"));
        assert!(!is_jpeg_name("a.png"));
        assert!(!is_jpeg_name("jpg"));
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden_name(".DS_Store"));
        assert!(is_hidden_name("._1.jpg"));
        assert!(!is_hidden_name("1.jpg"));
    }
}
