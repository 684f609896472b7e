//! Derived columns for stored records.

use std::collections::BTreeSet;

use crate::game_data::{SpellLevelResolver, base_class};
use crate::record::{CastAttemptRecord, EnrichedRecord};

/// Gaps at or below this many levels do not count.
pub const LEVEL_GAP_THRESHOLD: u32 = 6;

/// Character level minus spell level, when that exceeds the threshold.
///
/// Unknown spell levels give 0.
pub fn level_gap(character_level: u32, spell_level: Option<u32>) -> u32 {
    match spell_level {
        Some(spell_level) => {
            let gap = character_level.saturating_sub(spell_level);
            if gap > LEVEL_GAP_THRESHOLD { gap } else { 0 }
        }
        None => 0,
    }
}

/// What enrichment could not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub records: usize,
    /// (spell, base class) pairs without a known level.
    pub unknown_spells: BTreeSet<(String, String)>,
}

/// Normalize each record's class and attach its level gap.
pub fn enrich_records(
    records: Vec<CastAttemptRecord>,
    resolver: &mut SpellLevelResolver,
) -> (Vec<EnrichedRecord>, EnrichmentSummary) {
    let mut summary = EnrichmentSummary {
        records: records.len(),
        ..Default::default()
    };

    let enriched = records
        .into_iter()
        .map(|mut record| {
            record.class = base_class(&record.class).to_string();
            let spell_level = resolver.resolve(&record.spell, &record.class);
            if spell_level.is_none() {
                summary
                    .unknown_spells
                    .insert((record.spell.clone(), record.class.clone()));
            }
            let gap = level_gap(record.level, spell_level);
            EnrichedRecord::new(record, gap)
        })
        .collect();

    if !summary.unknown_spells.is_empty() {
        tracing::warn!(
            unknown = summary.unknown_spells.len(),
            "Spell levels unknown; level gap set to 0"
        );
    }
    (enriched, summary)
}
