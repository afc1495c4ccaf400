use super::extract::entries::EntryKind;
use super::extract::stats::StatBlock;
use crate::record::TagCategory;

/// Where the scanner is in the sheet. Starts at `None`; only header lines move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Emotional,
    Conceptual,
    Worldline,
    SoulState,
    Statistics,
    Traits,
    Powers,
    Notes,
}

/// Header lines, matched against the whole trimmed line. The last two are
/// terminal markers: both open the notes section.
const HEADERS: &[(&str, Section)] = &[
    ("Emotional Meridians", Section::Emotional),
    ("Conceptual Alignments", Section::Conceptual),
    ("Worldline Affinities", Section::Worldline),
    ("Soul-State Status", Section::SoulState),
    ("Statistic Makeup", Section::Statistics),
    ("Traits", Section::Traits),
    ("Base Powerset", Section::Powers),
    ("Additional Rules", Section::Notes),
    ("END", Section::Notes),
];

pub fn detect_header(line: &str) -> Option<Section> {
    HEADERS
        .iter()
        .find(|(header, _)| *header == line)
        .map(|(_, section)| *section)
}

/// What happens to a line that is not the name, a quote, a header or a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePolicy {
    Discard,
    Tags(TagCategory),
    Stats(StatBlock),
    Entries(EntryKind),
    Notes,
}

impl Section {
    pub fn policy(self) -> LinePolicy {
        match self {
            Section::None => LinePolicy::Discard,
            Section::Emotional => LinePolicy::Tags(TagCategory::Emotional),
            Section::Conceptual => LinePolicy::Tags(TagCategory::Conceptual),
            Section::Worldline => LinePolicy::Tags(TagCategory::Worldline),
            Section::SoulState => LinePolicy::Stats(StatBlock::SoulState),
            Section::Statistics => LinePolicy::Stats(StatBlock::Statistics),
            Section::Traits => LinePolicy::Entries(EntryKind::Trait),
            Section::Powers => LinePolicy::Entries(EntryKind::Power),
            Section::Notes => LinePolicy::Notes,
        }
    }

    /// Entry and notes text is never read as `Label: value`.
    pub fn reads_fields(self) -> bool {
        match self {
            Section::None
            | Section::Emotional
            | Section::Conceptual
            | Section::Worldline
            | Section::SoulState
            | Section::Statistics => true,
            Section::Traits | Section::Powers | Section::Notes => false,
        }
    }
}
