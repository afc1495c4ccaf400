use std::collections::HashMap;
use std::sync::LazyLock;

use crate::record::IdentityField;

static FIELD_LABELS: LazyLock<HashMap<&'static str, IdentityField>> = LazyLock::new(|| {
    IdentityField::ALL
        .iter()
        .map(|field| (field.label(), *field))
        .collect()
});

/// Read a `Label: value` line. The label must be on the allow-list verbatim and
/// the first colon must sit fewer than `colon_limit` characters into the line.
pub fn extract(line: &str, colon_limit: usize) -> Option<(IdentityField, String)> {
    let colon = line.find(':')?;
    let (label, rest) = line.split_at(colon);
    if label.chars().count() >= colon_limit {
        return None;
    }
    let field = FIELD_LABELS.get(label.trim())?;
    Some((*field, rest[1..].trim().to_string()))
}
