const BOM: char = '\u{feff}';

/// Split pasted text into trimmed, non-blank lines. A byte order mark counts
/// as whitespace.
pub fn normalize_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(|l| l.trim_matches(|c: char| c.is_whitespace() || c == BOM))
        .filter(|l| !l.is_empty())
        .collect()
}
