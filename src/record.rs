use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered tag identifiers for one alignment category. Duplicates are kept.
pub type TagSet = Vec<String>;

/// A character sheet as produced by the importer and kept in the store.
///
/// Field names follow the editor's JSON layout so exported files load back
/// without conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "characterName", default)]
    pub name: String,
    #[serde(rename = "characterQuote", default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(default)]
    pub emotional_meridians: TagSet,
    #[serde(default)]
    pub conceptual_alignments: TagSet,
    #[serde(default)]
    pub worldline_affinities: TagSet,
    #[serde(default)]
    pub soul_state: BTreeMap<SoulStat, String>,
    #[serde(default)]
    pub statistics: BTreeMap<MainStat, String>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub powers: Vec<Power>,
    #[serde(rename = "additionalRules", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl ImportedRecord {
    /// Empty record with a freshly generated id.
    pub fn empty() -> Self {
        ImportedRecord {
            id: fresh_id(),
            ..Default::default()
        }
    }

    pub fn tags_mut(&mut self, category: TagCategory) -> &mut TagSet {
        match category {
            TagCategory::Emotional => &mut self.emotional_meridians,
            TagCategory::Conceptual => &mut self.conceptual_alignments,
            TagCategory::Worldline => &mut self.worldline_affinities,
        }
    }

    /// Appends a line to the notes, newline-joined.
    pub fn push_note(&mut self, line: &str) {
        match &mut self.notes {
            Some(notes) => {
                notes.push('\n');
                notes.push_str(line);
            }
            None => self.notes = Some(line.to_string()),
        }
    }
}

/// `char_` followed by a v4 UUID in simple form.
pub fn fresh_id() -> String {
    format!("char_{}", Uuid::new_v4().simple())
}

/// The eleven single-valued identity fields. Unset fields are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sephira_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grudge_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genotype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascension_state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Theme,
    Sponsor,
    SephiraState,
    Rank,
    Role,
    OriginNode,
    Potential,
    GrudgeLevel,
    Genotype,
    BloodPattern,
    AscensionState,
}

impl IdentityField {
    pub const ALL: [IdentityField; 11] = [
        IdentityField::Theme,
        IdentityField::Sponsor,
        IdentityField::SephiraState,
        IdentityField::Rank,
        IdentityField::Role,
        IdentityField::OriginNode,
        IdentityField::Potential,
        IdentityField::GrudgeLevel,
        IdentityField::Genotype,
        IdentityField::BloodPattern,
        IdentityField::AscensionState,
    ];

    /// The label as it is written in a pasted sheet (`Label: value`).
    pub fn label(self) -> &'static str {
        match self {
            IdentityField::Theme => "Theme",
            IdentityField::Sponsor => "Sponsor",
            IdentityField::SephiraState => "True Sephira State",
            IdentityField::Rank => "Sea of Stars Rank",
            IdentityField::Role => "Sea of Stars Role",
            IdentityField::OriginNode => "Origin Node",
            IdentityField::Potential => "Potential",
            IdentityField::GrudgeLevel => "Grudge Level",
            IdentityField::Genotype => "Genotype",
            IdentityField::BloodPattern => "Blood Pattern",
            IdentityField::AscensionState => "Ascension State",
        }
    }
}

impl Identity {
    pub fn set(&mut self, field: IdentityField, value: String) {
        *self.slot(field) = Some(value);
    }

    pub fn get(&self, field: IdentityField) -> Option<&str> {
        let value = match field {
            IdentityField::Theme => &self.theme,
            IdentityField::Sponsor => &self.sponsor,
            IdentityField::SephiraState => &self.sephira_state,
            IdentityField::Rank => &self.rank,
            IdentityField::Role => &self.role,
            IdentityField::OriginNode => &self.origin_node,
            IdentityField::Potential => &self.potential,
            IdentityField::GrudgeLevel => &self.grudge_level,
            IdentityField::Genotype => &self.genotype,
            IdentityField::BloodPattern => &self.blood_pattern,
            IdentityField::AscensionState => &self.ascension_state,
        };
        value.as_deref()
    }

    fn slot(&mut self, field: IdentityField) -> &mut Option<String> {
        match field {
            IdentityField::Theme => &mut self.theme,
            IdentityField::Sponsor => &mut self.sponsor,
            IdentityField::SephiraState => &mut self.sephira_state,
            IdentityField::Rank => &mut self.rank,
            IdentityField::Role => &mut self.role,
            IdentityField::OriginNode => &mut self.origin_node,
            IdentityField::Potential => &mut self.potential,
            IdentityField::GrudgeLevel => &mut self.grudge_level,
            IdentityField::Genotype => &mut self.genotype,
            IdentityField::BloodPattern => &mut self.blood_pattern,
            IdentityField::AscensionState => &mut self.ascension_state,
        }
    }
}

/// Alignment category; each owns one [`TagSet`] and a two-letter id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Emotional,
    Conceptual,
    Worldline,
}

impl TagCategory {
    pub fn code(self) -> &'static str {
        match self {
            TagCategory::Emotional => "em",
            TagCategory::Conceptual => "ca",
            TagCategory::Worldline => "wa",
        }
    }
}

/// Soul-State Status attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoulStat {
    Cognition,
    Memory,
    Emanation,
    Comprehension,
    Stagnation,
    Inversion,
    Dissonance,
    Resonance,
}

impl SoulStat {
    pub const ALL: [SoulStat; 8] = [
        SoulStat::Cognition,
        SoulStat::Memory,
        SoulStat::Emanation,
        SoulStat::Comprehension,
        SoulStat::Stagnation,
        SoulStat::Inversion,
        SoulStat::Dissonance,
        SoulStat::Resonance,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SoulStat::Cognition => "cognition",
            SoulStat::Memory => "memory",
            SoulStat::Emanation => "emanation",
            SoulStat::Comprehension => "comprehension",
            SoulStat::Stagnation => "stagnation",
            SoulStat::Inversion => "inversion",
            SoulStat::Dissonance => "dissonance",
            SoulStat::Resonance => "resonance",
        }
    }
}

/// Statistic Makeup attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainStat {
    Power,
    Agility,
    Tenacity,
    Discipline,
    Empathy,
    Presence,
    Reasoning,
    Intuition,
    Synchronicity,
}

impl MainStat {
    pub const ALL: [MainStat; 9] = [
        MainStat::Power,
        MainStat::Agility,
        MainStat::Tenacity,
        MainStat::Discipline,
        MainStat::Empathy,
        MainStat::Presence,
        MainStat::Reasoning,
        MainStat::Intuition,
        MainStat::Synchronicity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MainStat::Power => "power",
            MainStat::Agility => "agility",
            MainStat::Tenacity => "tenacity",
            MainStat::Discipline => "discipline",
            MainStat::Empathy => "empathy",
            MainStat::Presence => "presence",
            MainStat::Reasoning => "reasoning",
            MainStat::Intuition => "intuition",
            MainStat::Synchronicity => "synchronicity",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}
