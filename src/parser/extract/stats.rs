use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::{ImportedRecord, MainStat, SoulStat};

/// Which attribute block a stat section feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatBlock {
    SoulState,
    Statistics,
}

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").unwrap());

static SOUL_STATS: LazyLock<HashMap<&'static str, SoulStat>> =
    LazyLock::new(|| SoulStat::ALL.iter().map(|s| (s.key(), *s)).collect());

static MAIN_STATS: LazyLock<HashMap<&'static str, MainStat>> =
    LazyLock::new(|| MainStat::ALL.iter().map(|s| (s.key(), *s)).collect());

/// Lowercased label and the raw trailing number of a stat line.
pub fn split_stat_line(line: &str) -> Option<(String, &str)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (value, label) = tokens.split_last()?;
    if label.is_empty() || !NUMBER_RE.is_match(value) {
        return None;
    }
    Some((label.join(" ").to_lowercase(), value))
}

/// Store the stat on `record` if the line has the right shape and a known
/// label for `block`. The number is kept exactly as written.
pub fn apply(record: &mut ImportedRecord, block: StatBlock, line: &str) -> bool {
    let Some((label, value)) = split_stat_line(line) else {
        return false;
    };
    match block {
        StatBlock::SoulState => match SOUL_STATS.get(label.as_str()) {
            Some(stat) => {
                record.soul_state.insert(*stat, value.to_string());
                true
            }
            None => false,
        },
        StatBlock::Statistics => match MAIN_STATS.get(label.as_str()) {
            Some(stat) => {
                record.statistics.insert(*stat, value.to_string());
                true
            }
            None => false,
        },
    }
}
