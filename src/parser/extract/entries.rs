use crate::record::{ImportedRecord, Power, Trait};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Trait,
    Power,
}

/// What [`EntryAggregator::feed`] did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLine {
    Title,
    Body,
    Dropped,
}

#[derive(Debug)]
struct OpenEntry {
    kind: EntryKind,
    title: String,
    body: Vec<String>,
}

/// Collects title/body entries for the Traits and Base Powerset sections.
///
/// At most one entry is open at a time. It reaches the record only through
/// [`flush`](Self::flush), which the scanner calls on a new title, on every
/// section change and at end of input.
#[derive(Debug)]
pub struct EntryAggregator {
    open: Option<OpenEntry>,
    title_max_len: usize,
}

impl EntryAggregator {
    pub fn new(title_max_len: usize) -> Self {
        EntryAggregator {
            open: None,
            title_max_len,
        }
    }

    /// Short lines that don't start with a lowercase ASCII letter open an entry.
    pub fn is_title(&self, line: &str) -> bool {
        line.chars().count() < self.title_max_len
            && !line.starts_with(|c: char| c.is_ascii_lowercase())
    }

    pub fn feed(&mut self, kind: EntryKind, line: &str, record: &mut ImportedRecord) -> EntryLine {
        if self.is_title(line) {
            self.flush(record);
            self.open = Some(OpenEntry {
                kind,
                title: line.to_string(),
                body: Vec::new(),
            });
            return EntryLine::Title;
        }
        match &mut self.open {
            Some(open) if open.kind == kind => {
                open.body.push(line.to_string());
                EntryLine::Body
            }
            _ => EntryLine::Dropped,
        }
    }

    /// Commit the open entry, if any. Returns the kind that was committed.
    pub fn flush(&mut self, record: &mut ImportedRecord) -> Option<EntryKind> {
        let entry = self.open.take()?;
        let description = entry.body.join("\n");
        if entry.title.is_empty() && description.is_empty() {
            return None;
        }
        match entry.kind {
            EntryKind::Trait => record.traits.push(Trait {
                title: entry.title,
                description,
            }),
            EntryKind::Power => record.powers.push(Power {
                name: entry.title,
                description,
            }),
        }
        Some(entry.kind)
    }
}
