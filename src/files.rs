use std::path::Path;

use anyhow::{Context, Result};

use crate::record::{fresh_id, ImportedRecord};

const FALLBACK_STEM: &str = "character";

/// `<characterName>.json`, with characters that are unsafe in file names replaced.
pub fn export_file_name(record: &ImportedRecord) -> String {
    let name = record.name.trim();
    let stem: String = if name.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        name.chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    format!("{}.json", stem)
}

pub fn write_record(record: &ImportedRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))
}

/// Read an exported record. A file without an id gets a fresh one.
pub fn read_record(path: &Path) -> Result<ImportedRecord> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let mut record: ImportedRecord = serde_json::from_str(&raw)
        .with_context(|| format!("{:?} is not a character record", path))?;
    if record.id.trim().is_empty() {
        record.id = fresh_id();
    }
    Ok(record)
}
