pub mod extract;
pub mod lines;
pub mod sections;

use tracing::{debug, trace};

use crate::config::ParseLimits;
use crate::error::ImportError;
use crate::record::ImportedRecord;
use extract::entries::{EntryAggregator, EntryLine};
use extract::{fields, stats, tags};
use sections::{LinePolicy, Section};

/// Single pass over a pasted sheet: lines → section state machine → record.
#[allow(dead_code)]
pub fn parse_document(text: &str) -> Result<ImportedRecord, ImportError> {
    parse_document_with(text, &ParseLimits::default())
}

pub fn parse_document_with(
    text: &str,
    limits: &ParseLimits,
) -> Result<ImportedRecord, ImportError> {
    let lines = lines::normalize_lines(text);
    let (name, rest) = lines.split_first().ok_or(ImportError::EmptyInput)?;

    let mut scanner = Scanner::new(name, limits);
    for line in rest {
        scanner.scan(line);
    }
    let record = scanner.finish();
    debug!(
        id = %record.id,
        name = %record.name,
        traits = record.traits.len(),
        powers = record.powers.len(),
        "parsed sheet"
    );
    Ok(record)
}

/// Owns the working record for one parse call.
struct Scanner<'a> {
    record: ImportedRecord,
    section: Section,
    entries: EntryAggregator,
    limits: &'a ParseLimits,
}

impl<'a> Scanner<'a> {
    fn new(name: &str, limits: &'a ParseLimits) -> Self {
        let mut record = ImportedRecord::empty();
        record.name = name.to_string();
        Scanner {
            record,
            section: Section::None,
            entries: EntryAggregator::new(limits.title_max_len),
            limits,
        }
    }

    fn scan(&mut self, line: &str) {
        if let Some(quote) = strip_quote(line) {
            self.record.quote = Some(quote.to_string());
            return;
        }

        if let Some(next) = sections::detect_header(line) {
            self.enter(next);
            return;
        }

        if self.section.reads_fields() {
            if let Some((field, value)) = fields::extract(line, self.limits.field_colon_limit) {
                self.record.identity.set(field, value);
                return;
            }
        }

        match self.section.policy() {
            LinePolicy::Discard => trace!(line, "no section yet, line dropped"),
            LinePolicy::Tags(category) => {
                let ids = tags::split_tags(line, category);
                self.record.tags_mut(category).extend(ids);
            }
            LinePolicy::Stats(block) => {
                if !stats::apply(&mut self.record, block, line) {
                    trace!(line, ?block, "not a known stat, line dropped");
                }
            }
            LinePolicy::Entries(kind) => {
                if self.entries.feed(kind, line, &mut self.record) == EntryLine::Dropped {
                    trace!(line, ?kind, "body text with no open entry, line dropped");
                }
            }
            LinePolicy::Notes => self.record.push_note(line),
        }
    }

    fn enter(&mut self, next: Section) {
        if let Some(kind) = self.entries.flush(&mut self.record) {
            trace!(?kind, "entry closed by section header");
        }
        debug!(from = ?self.section, to = ?next, "section change");
        self.section = next;
    }

    fn finish(mut self) -> ImportedRecord {
        self.entries.flush(&mut self.record);
        self.record
    }
}

/// Text of a line wrapped in a pair of `"`.
fn strip_quote(line: &str) -> Option<&str> {
    line.strip_prefix('"')?.strip_suffix('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Identity, MainStat, Power, SoulStat, Trait};
    use pretty_assertions::assert_eq;

    fn fixture(name: &str) -> ImportedRecord {
        let text = std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap();
        parse_document(&text).unwrap()
    }

    fn parse(text: &str) -> ImportedRecord {
        parse_document(text).unwrap()
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(parse_document(""), Err(ImportError::EmptyInput));
        assert_eq!(parse_document("  \n\t\n   \r\n"), Err(ImportError::EmptyInput));
    }

    #[test]
    fn name_only() {
        let record = parse("  Vess Arclight  ");
        assert_eq!(record.name, "Vess Arclight");
        assert!(record.id.starts_with("char_"));
        assert!(record.traits.is_empty());
        assert_eq!(record.notes, None);
    }

    #[test]
    fn first_line_is_always_the_name() {
        let record = parse("Traits\nBrave");
        assert_eq!(record.name, "Traits");
        assert!(record.traits.is_empty());
    }

    #[test]
    fn full_sheet() {
        let r = fixture("vess_arclight");
        assert_eq!(r.name, "Vess Arclight");
        assert_eq!(r.quote.as_deref(), Some("Every star remembers the hand that lit it."));

        let id = &r.identity;
        assert_eq!(id.theme.as_deref(), Some("Echoes of a Dead Sun"));
        assert_eq!(id.sponsor.as_deref(), Some("The Lantern Choir"));
        assert_eq!(id.sephira_state.as_deref(), Some("Tiferet (Veiled)"));
        assert_eq!(id.rank.as_deref(), Some("4"));
        assert_eq!(id.role.as_deref(), Some("Vanguard"));
        assert_eq!(id.origin_node.as_deref(), Some("7-Kappa"));
        assert_eq!(id.potential.as_deref(), Some("B+"));
        assert_eq!(id.grudge_level.as_deref(), Some("2"));
        assert_eq!(id.genotype.as_deref(), Some("Solar Drifter"));
        assert_eq!(id.blood_pattern.as_deref(), Some("Gilded"));
        assert_eq!(id.ascension_state.as_deref(), Some("Dormant"));

        assert_eq!(r.emotional_meridians, vec!["em-hope", "em-will", "em-wonder", "em-regret"]);
        assert_eq!(r.conceptual_alignments, vec!["ca-creation", "ca-time"]);
        assert_eq!(r.worldline_affinities, vec!["wa-aether", "wa-deep-void"]);

        assert_eq!(r.soul_state.len(), 8);
        assert_eq!(r.soul_state[&SoulStat::Cognition], "7");
        assert_eq!(r.soul_state[&SoulStat::Inversion], "0");
        assert_eq!(r.statistics.len(), 9);
        assert_eq!(r.statistics[&MainStat::Intuition], "8");

        assert_eq!(
            r.traits,
            vec![
                Trait {
                    title: "Starlit Resolve".into(),
                    description: "once per scene, Vess may reroll a failed Tenacity check.\nthe reroll must be kept.".into(),
                },
                Trait {
                    title: "Lantern Bearer".into(),
                    description: "allies within reach ignore darkness penalties.".into(),
                },
            ]
        );
        assert_eq!(
            r.powers,
            vec![
                Power {
                    name: "Arclight Lance".into(),
                    description: "a spear of condensed starlight: deals Power + 2 damage.".into(),
                },
                Power {
                    name: "Potential: doubled under an open sky".into(),
                    description: String::new(),
                },
                Power {
                    name: "Corona Step".into(),
                    description: "short-range blink between lit surfaces.".into(),
                },
            ]
        );
        assert_eq!(
            r.notes.as_deref(),
            Some("Cannot enter Void-aligned nodes without an escort.\nCounts as Rank 5 for Choir events.")
        );
    }

    #[test]
    fn fragment_without_terminal_marker() {
        let r = fixture("ossia_fragment");
        assert_eq!(r.name, "Ossia of the Ninth Bell");
        assert_eq!(r.identity.theme.as_deref(), Some("Bells Underwater"));
        assert_eq!(r.identity.sponsor.as_deref(), Some("unknown at this time"));

        // A trait left open when the stats header arrives is kept, in order.
        let titles: Vec<&str> = r.traits.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Tidebound", "Echo Sense"]);
        assert_eq!(r.traits[1].description, "hears through stone\nand through sleep.");

        assert_eq!(r.statistics.len(), 1);
        assert_eq!(r.statistics[&MainStat::Power], "3");

        let names: Vec<&str> = r.powers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Undertow", "Ninth Toll"]);
        assert_eq!(r.powers[1].description, "all who hear it must stop.");
        assert_eq!(r.notes, None);
    }

    #[test]
    fn alignment_line() {
        let r = parse("X\nEmotional Meridians\nA / B / C");
        assert_eq!(r.emotional_meridians, vec!["em-a", "em-b", "em-c"]);
    }

    #[test]
    fn stat_lines() {
        let r = parse("X\nSoul-State Status\nCognition 7\nUnknown Thing 7");
        assert_eq!(r.soul_state.len(), 1);
        assert_eq!(r.soul_state[&SoulStat::Cognition], "7");
    }

    #[test]
    fn traits_section() {
        let r = parse("X\nTraits\nBrave\nStands firm.\nCourageous\nNever flinches.");
        // Capitalized short lines are titles too, so each line opens an entry.
        assert_eq!(r.traits.len(), 4);

        let r = parse("X\nTraits\nBrave\nstands firm.\nCourageous\nnever flinches.");
        assert_eq!(
            r.traits,
            vec![
                Trait { title: "Brave".into(), description: "stands firm.".into() },
                Trait { title: "Courageous".into(), description: "never flinches.".into() },
            ]
        );
    }

    #[test]
    fn new_title_flushes_empty_entry() {
        let r = parse("X\nTraits\nBrave\nCourageous\nnever flinches.");
        assert_eq!(r.traits[0], Trait { title: "Brave".into(), description: String::new() });
        assert_eq!(r.traits.len(), 2);
    }

    #[test]
    fn open_power_flushed_at_end_of_input() {
        let r = parse("X\nBase Powerset\nFlare\nburns bright.");
        assert_eq!(
            r.powers,
            vec![Power { name: "Flare".into(), description: "burns bright.".into() }]
        );
    }

    #[test]
    fn terminal_marker_flushes_power() {
        for marker in ["END", "Additional Rules"] {
            let r = parse(&format!("X\nBase Powerset\nFlare\nburns.\n{marker}\nsee errata"));
            assert_eq!(r.powers.len(), 1, "{marker}");
            assert_eq!(r.powers[0].description, "burns.");
            assert_eq!(r.notes.as_deref(), Some("see errata"));
        }
    }

    #[test]
    fn reentering_powers_flushes_open_entry() {
        let r = parse("X\nBase Powerset\nFlare\nburns.\nBase Powerset\nNova\nexplodes.");
        let names: Vec<&str> = r.powers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Flare", "Nova"]);
    }

    #[test]
    fn field_lines() {
        let r = parse("X\nTheme: Echoes\nFavourite Colour: teal");
        assert_eq!(
            r.identity,
            Identity {
                theme: Some("Echoes".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn fields_read_inside_list_and_stat_sections() {
        let r = parse("X\nWorldline Affinities\nSponsor: The Choir\nVoid\nStatistic Makeup\nSea of Stars Role: Scout\nPower 2");
        assert_eq!(r.identity.sponsor.as_deref(), Some("The Choir"));
        assert_eq!(r.identity.role.as_deref(), Some("Scout"));
        assert_eq!(r.worldline_affinities, vec!["wa-void"]);
        assert_eq!(r.statistics[&MainStat::Power], "2");
    }

    #[test]
    fn partial_label_falls_through_to_stats() {
        let r = parse("X\nStatistic Makeup\nRole: Scout\nPower 2\nSea of Stars Role: Scout");
        assert_eq!(r.identity.role.as_deref(), Some("Scout"));
        assert_eq!(r.statistics.len(), 1);
        assert_eq!(r.statistics[&MainStat::Power], "2");

        let bare = parse("X\nStatistic Makeup\nRole: Scout");
        assert_eq!(bare.identity, Identity::default());
        assert!(bare.statistics.is_empty());
    }

    #[test]
    fn byte_order_mark_is_not_part_of_the_name() {
        let r = parse("\u{feff}Vess\r\nTheme: Echoes\r\n");
        assert_eq!(r.name, "Vess");
        assert_eq!(r.identity.theme.as_deref(), Some("Echoes"));
    }

    #[test]
    fn field_labels_not_read_in_entries_or_notes() {
        let r = parse("X\nTraits\nTheme: Echoes\nEND\nSponsor: nobody");
        assert_eq!(r.identity.theme, None);
        assert_eq!(r.identity.sponsor, None);
        assert_eq!(r.traits[0].title, "Theme: Echoes");
        assert_eq!(r.notes.as_deref(), Some("Sponsor: nobody"));
    }

    #[test]
    fn last_field_write_wins() {
        let r = parse("X\nTheme: First\nTheme: Second");
        assert_eq!(r.identity.theme.as_deref(), Some("Second"));
    }

    #[test]
    fn quote_detected_in_any_section() {
        let r = parse("X\nTraits\nBrave\n\"Never again.\"\nstands firm.");
        assert_eq!(r.quote.as_deref(), Some("Never again."));
        assert_eq!(r.traits[0].description, "stands firm.");
    }

    #[test]
    fn lone_quote_mark_is_not_a_quote() {
        let r = parse("X\nEND\n\"");
        assert_eq!(r.quote, None);
        assert_eq!(r.notes.as_deref(), Some("\""));
    }

    #[test]
    fn lines_before_any_section_are_dropped() {
        let r = parse("X\nsome preamble\nAnother Line");
        assert_eq!(r.notes, None);
        assert!(r.traits.is_empty());
        assert!(r.emotional_meridians.is_empty());
    }

    #[test]
    fn headers_are_recognized_inside_notes() {
        let r = parse("X\nAdditional Rules\nrule one\nTraits\nLate Trait");
        assert_eq!(r.notes.as_deref(), Some("rule one"));
        assert_eq!(r.traits[0].title, "Late Trait");
    }

    #[test]
    fn reparse_differs_only_in_id() {
        let text = std::fs::read_to_string("tests/fixtures/vess_arclight.txt").unwrap();
        let a = parse_document(&text).unwrap();
        let mut b = parse_document(&text).unwrap();
        assert_ne!(a.id, b.id);
        b.id = a.id.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_limits() {
        let limits = ParseLimits {
            field_colon_limit: 4,
            title_max_len: 6,
        };
        let r = parse_document_with("X\nTheme: Echoes\nTraits\nBrave\nLonger Title", &limits).unwrap();
        assert_eq!(r.identity.theme, None);
        assert_eq!(
            r.traits,
            vec![Trait { title: "Brave".into(), description: "Longer Title".into() }]
        );
    }
}
