//! Delimited text storage for cast attempt records.
//!
//! Two layouts share one format: the raw layout written by `parse`, and the
//! enriched layout that appends a `level gap` column. Readers look columns
//! up by header name, so either layout can be read back as
//! [`EnrichedRecord`](crate::record::EnrichedRecord)s (gap 0 when absent).

mod reader;
mod writer;

pub use reader::{HeaderProblem, ReadStats, parse_records, read_raw_records, read_records};
pub use writer::{write_enriched, write_enriched_file, write_raw, write_raw_file};

pub const SKILL_COLUMN: &str = "channeling skill";
pub const LEVEL_COLUMN: &str = "level";
pub const CLASS_COLUMN: &str = "class";
pub const SPELL_COLUMN: &str = "spell";
pub const HITS_COLUMN: &str = "hits";
pub const RESULT_COLUMN: &str = "result";
pub const LEVEL_GAP_COLUMN: &str = "level gap";

pub const RAW_HEADER: [&str; 6] = [
    SKILL_COLUMN,
    LEVEL_COLUMN,
    CLASS_COLUMN,
    SPELL_COLUMN,
    HITS_COLUMN,
    RESULT_COLUMN,
];

pub const ENRICHED_HEADER: [&str; 7] = [
    SKILL_COLUMN,
    LEVEL_COLUMN,
    CLASS_COLUMN,
    SPELL_COLUMN,
    HITS_COLUMN,
    RESULT_COLUMN,
    LEVEL_GAP_COLUMN,
];
