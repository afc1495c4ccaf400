use std::sync::LazyLock;

use regex::Regex;

use crate::record::TagCategory;

const SEPARATOR: char = '/';

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Tag ids for every `/`-separated item on an alignment line, in line order.
pub fn split_tags(line: &str, category: TagCategory) -> Vec<String> {
    line.split(SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| tag_id(category, item))
        .collect()
}

/// `em-sudden-joy` for "Sudden  Joy" under Emotional Meridians.
pub fn tag_id(category: TagCategory, label: &str) -> String {
    format!("{}-{}", category.code(), normalize(label))
}

fn normalize(label: &str) -> String {
    WHITESPACE_RE
        .replace_all(&label.trim().to_lowercase(), "-")
        .into_owned()
}
