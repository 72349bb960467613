//! Vehicle identifier extraction from directory names.
//!
//! Two folder conventions are in use, selected by [`PatternMode`]:
//!
//! | Mode | Folder name | Identifier |
//! |---|---|---|
//! | `Dated` | `2025_11_06_芜湖_1234567_英菲尼迪` | `1234567` |
//! | `Prefixed` | `1234567_英菲尼迪G37` | `1234567` |
//!
//! A name that does not fit its pattern is a normal outcome (`None`), not an
//! error: the caller skips that directory for the current pass.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `YYYY_M_D_<city>_<digits>_<rest>`; the city is any run without underscores.
static DATED_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}_\d{1,2}_\d{1,2}_[^_]+_(\d+)_").unwrap());

/// `<digits>_<rest>`.
static PREFIXED_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_").unwrap());

/// Which directory naming convention to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternMode {
    /// One directory per vehicle, named after the shoot date and city.
    #[default]
    Dated,
    /// One directory per vehicle whose name starts with its identifier.
    Prefixed,
}

impl PatternMode {
    fn regex(self) -> &'static Regex {
        match self {
            PatternMode::Dated => &DATED_UNIT,
            PatternMode::Prefixed => &PREFIXED_IDENTIFIER,
        }
    }

    /// Human-readable shape of a matching name, used in warnings.
    pub fn expected_shape(self) -> &'static str {
        match self {
            PatternMode::Dated => "YYYY_M_D_<city>_<digits>_<rest>",
            PatternMode::Prefixed => "<digits>_<rest>",
        }
    }
}

impl std::fmt::Display for PatternMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternMode::Dated => f.write_str("dated"),
            PatternMode::Prefixed => f.write_str("prefixed"),
        }
    }
}

/// Extract the vehicle identifier from a directory name.
///
/// Returns the digit run captured by the mode's pattern, or `None` when the
/// name does not match.
pub fn extract_identifier(name: &str, mode: PatternMode) -> Option<String> {
    mode.regex()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_extracts_digits_after_city() {
        assert_eq!(
            extract_identifier("2025_11_06_芜湖_1234567_英菲尼迪", PatternMode::Dated),
            Some("1234567".to_string())
        );
    }

    #[test]
    fn dated_accepts_single_digit_month_and_day() {
        assert_eq!(
            extract_identifier("2025_1_1_A_9999999_X", PatternMode::Dated),
            Some("9999999".to_string())
        );
    }

    #[test]
    fn dated_city_may_be_multibyte_or_mixed() {
        assert_eq!(
            extract_identifier("2024_12_31_New-York 2_42_rest", PatternMode::Dated),
            Some("42".to_string())
        );
    }

    #[test]
    fn dated_requires_delimiter_after_identifier() {
        assert_eq!(
            extract_identifier("2025_11_06_芜湖_1234567", PatternMode::Dated),
            None
        );
    }

    #[test]
    fn dated_rejects_non_digit_identifier() {
        assert_eq!(
            extract_identifier("2025_11_06_芜湖_张三01_x", PatternMode::Dated),
            None
        );
    }

    #[test]
    fn dated_rejects_short_year() {
        assert_eq!(
            extract_identifier("25_11_06_芜湖_1234567_x", PatternMode::Dated),
            None
        );
    }

    #[test]
    fn dated_rejects_prefixed_name() {
        assert_eq!(
            extract_identifier("1234567_英菲尼迪G37", PatternMode::Dated),
            None
        );
    }

    #[test]
    fn prefixed_extracts_leading_digits() {
        assert_eq!(
            extract_identifier("1234567_英菲尼迪G37", PatternMode::Prefixed),
            Some("1234567".to_string())
        );
    }

    #[test]
    fn prefixed_takes_only_first_run() {
        // A dated name also starts with digits and an underscore.
        assert_eq!(
            extract_identifier("2025_11_06_芜湖_1234567_x", PatternMode::Prefixed),
            Some("2025".to_string())
        );
    }

    #[test]
    fn prefixed_rejects_missing_delimiter() {
        assert_eq!(extract_identifier("1234567", PatternMode::Prefixed), None);
        assert_eq!(extract_identifier("car_1234567", PatternMode::Prefixed), None);
    }

    #[test]
    fn empty_name_never_matches() {
        assert_eq!(extract_identifier("", PatternMode::Dated), None);
        assert_eq!(extract_identifier("", PatternMode::Prefixed), None);
    }

    #[test]
    fn pattern_mode_parses_from_toml_values() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: PatternMode,
        }
        let w: Wrapper = toml::from_str("mode = \"prefixed\"").unwrap();
        assert_eq!(w.mode, PatternMode::Prefixed);
    }
}
