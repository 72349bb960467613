//! Shot-type rename tables.
//!
//! Every inspection captures the same 29 shots. A rule table is the ordered
//! list of filename suffixes for those shots: the k-th collected photo gets
//! the k-th suffix, appended to the vehicle identifier. The number inside each
//! suffix is the shot's catalogue number, not its position, which is why the
//! two tables below contain the same labels in different orders.
//!
//! Tables are data, never re-sorted.

use serde::{Deserialize, Serialize};

/// Number of photos (and suffixes) in one inspection set.
pub const SHOTS_PER_UNIT: usize = 29;

/// Capture order used with dated unit folders.
static STANDARD_ORDER: [&str; SHOTS_PER_UNIT] = [
    "_1_左前45度.jpg",
    "_2_正前方.jpg",
    "_3_右前45度.jpg",
    "_4_左侧面.jpg",
    "_5_左后45度.jpg",
    "_6_正后方.jpg",
    "_7_右后45度.jpg",
    "_9_右后大灯.jpg",
    "_11_钥匙.jpg",
    "_12_中控台.jpg",
    "_13_方向盘.jpg",
    "_14_组合仪表.jpg",
    "_15_里程数特写.jpg",
    "_16_音响及空调面板.jpg",
    "_18_变速杆.jpg",
    "_19_驾驶员座椅.jpg",
    "_20_驾驶位.jpg",
    "_21_后排.jpg",
    "_22_车内顶棚.jpg",
    "_23_后备箱.jpg",
    "_24_发动机舱.jpg",
    "_30_左侧底大边.jpg",
    "_29_右侧底大边.jpg",
    "_35_左前轮胎轮毂.jpg",
    "_36_左前大灯.jpg",
    "_41_右侧前座椅.jpg",
    "_44_右侧后座椅.jpg",
    "_57_车顶.jpg",
    "_58_右侧面.jpg",
];

/// Walk-around capture order used with identifier-prefixed folders.
static ALTERNATE_ORDER: [&str; SHOTS_PER_UNIT] = [
    "_58_右侧面.jpg",
    "_3_右前45度.jpg",
    "_2_正前方.jpg",
    "_36_左前大灯.jpg",
    "_1_左前45度.jpg",
    "_35_左前轮胎轮毂.jpg",
    "_4_左侧面.jpg",
    "_5_左后45度.jpg",
    "_6_正后方.jpg",
    "_7_右后45度.jpg",
    "_9_右后大灯.jpg",
    "_29_右侧底大边.jpg",
    "_30_左侧底大边.jpg",
    "_57_车顶.jpg",
    "_20_驾驶位.jpg",
    "_19_驾驶员座椅.jpg",
    "_21_后排.jpg",
    "_23_后备箱.jpg",
    "_24_发动机舱.jpg",
    "_41_右侧前座椅.jpg",
    "_44_右侧后座椅.jpg",
    "_12_中控台.jpg",
    "_22_车内顶棚.jpg",
    "_16_音响及空调面板.jpg",
    "_13_方向盘.jpg",
    "_14_组合仪表.jpg",
    "_15_里程数特写.jpg",
    "_18_变速杆.jpg",
    "_11_钥匙.jpg",
];

/// A named rename table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleTable {
    #[default]
    Standard,
    Alternate,
}

impl RuleTable {
    /// The ordered suffixes of this table.
    pub fn suffixes(self) -> &'static [&'static str; SHOTS_PER_UNIT] {
        match self {
            RuleTable::Standard => &STANDARD_ORDER,
            RuleTable::Alternate => &ALTERNATE_ORDER,
        }
    }

    pub fn len(self) -> usize {
        self.suffixes().len()
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Destination filename for the photo at `index` (0-based).
    pub fn file_name(self, identifier: &str, index: usize) -> Option<String> {
        self.suffixes()
            .get(index)
            .map(|suffix| format!("{identifier}{suffix}"))
    }
}

impl std::fmt::Display for RuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleTable::Standard => f.write_str("standard"),
            RuleTable::Alternate => f.write_str("alternate"),
        }
    }
}

/// Split a suffix like `_15_里程数特写.jpg` into its catalogue number and label.
pub fn parse_suffix(suffix: &str) -> Option<(u32, &str)> {
    let rest = suffix.strip_prefix('_')?;
    let (number, label) = rest.split_once('_')?;
    let label = label.strip_suffix(".jpg").unwrap_or(label);
    Some((number.parse().ok()?, label))
}
