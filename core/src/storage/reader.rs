use std::fs;
use std::path::Path;

use super::{
    CLASS_COLUMN, HITS_COLUMN, LEVEL_COLUMN, LEVEL_GAP_COLUMN, RESULT_COLUMN, SKILL_COLUMN,
    SPELL_COLUMN,
};
use crate::error::StorageError;
use crate::record::{CastAttemptRecord, EnrichedRecord, Outcome};

/// Counts from one read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub rows: usize,
    pub skipped: usize,
}

/// Why a header could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProblem {
    Empty,
    MissingColumn(&'static str),
}

/// Split delimited text into rows of fields.
///
/// Quoted fields may contain commas, doubled quotes and line breaks.
/// Blank lines produce no row.
fn split_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if !row.is_empty() || !field.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => field.push(c),
        }
    }

    if !row.is_empty() || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

struct Columns {
    skill: usize,
    level: usize,
    class: usize,
    spell: usize,
    hits: usize,
    result: usize,
    level_gap: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, HeaderProblem> {
        let find = |name: &str| {
            header.iter().position(|h| {
                h.trim_start_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(name)
            })
        };
        let require =
            |name: &'static str| find(name).ok_or(HeaderProblem::MissingColumn(name));

        Ok(Self {
            skill: require(SKILL_COLUMN)?,
            level: require(LEVEL_COLUMN)?,
            class: require(CLASS_COLUMN)?,
            spell: require(SPELL_COLUMN)?,
            hits: require(HITS_COLUMN)?,
            result: require(RESULT_COLUMN)?,
            level_gap: find(LEVEL_GAP_COLUMN),
        })
    }

    fn extract(&self, row: &[String]) -> Option<EnrichedRecord> {
        let int = |idx: usize| row.get(idx)?.trim().parse::<u32>().ok();

        let level_gap = match self.level_gap {
            None => 0,
            Some(idx) => match row.get(idx).map(|f| f.trim()) {
                None | Some("") => 0,
                Some(field) => field.parse().ok()?,
            },
        };

        let record = CastAttemptRecord {
            skill: int(self.skill)?,
            level: int(self.level)?,
            class: row.get(self.class)?.trim().to_string(),
            spell: row.get(self.spell)?.trim().to_string(),
            hits: int(self.hits)?,
            outcome: Outcome::from_field(row.get(self.result)?),
            provenance: None,
        };
        Some(EnrichedRecord::new(record, level_gap))
    }
}

/// Parse delimited text into records, skipping malformed rows.
pub fn parse_records(text: &str) -> Result<(Vec<EnrichedRecord>, ReadStats), HeaderProblem> {
    let mut rows = split_rows(text).into_iter();
    let header = rows.next().ok_or(HeaderProblem::Empty)?;
    let columns = Columns::from_header(&header)?;

    let mut stats = ReadStats::default();
    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        stats.rows += 1;
        match columns.extract(&row) {
            Some(record) => records.push(record),
            None => {
                stats.skipped += 1;
                // +2: header is row 1
                tracing::debug!(row = idx + 2, fields = ?row, "Skipping malformed row");
            }
        }
    }
    Ok((records, stats))
}

/// Read a raw or enriched record file.
pub fn read_records(path: &Path) -> Result<(Vec<EnrichedRecord>, ReadStats), StorageError> {
    let text = fs::read_to_string(path).map_err(|e| StorageError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let (records, stats) = parse_records(&text).map_err(|problem| match problem {
        HeaderProblem::Empty => StorageError::MissingHeader {
            path: path.to_path_buf(),
        },
        HeaderProblem::MissingColumn(column) => StorageError::MissingColumn {
            path: path.to_path_buf(),
            column,
        },
    })?;

    if stats.skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = stats.skipped,
            rows = stats.rows,
            "Skipped malformed rows"
        );
    }
    Ok((records, stats))
}

/// Read records and drop any level-gap column.
pub fn read_raw_records(path: &Path) -> Result<(Vec<CastAttemptRecord>, ReadStats), StorageError> {
    let (records, stats) = read_records(path)?;
    Ok((records.into_iter().map(|e| e.record).collect(), stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{write_enriched, write_raw_file};

    // ─────────────────────────────────────────────────────────────────────────
    // Row splitting
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_split_plain_rows() {
        let rows = split_rows("a,b,c\r\n1,2,3\n\n4,,6");
        assert_eq!(
            rows,
            vec![
                vec!["a", "b", "c"],
                vec!["1", "2", "3"],
                vec!["4", "", "6"],
            ]
        );
    }

    #[test]
    fn test_split_quoted_fields() {
        let rows = split_rows("\"Tashan, Greater\",\"say \"\"hi\"\"\",\"two\nlines\"\n");
        assert_eq!(rows, vec![vec!["Tashan, Greater", "say \"hi\"", "two\nlines"]]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Record parsing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_raw_layout_defaults_gap() {
        let text = "channeling skill,level,class,spell,hits,result\n\
                    120,40,Druid,Spirit of Oak,2,Success\n";
        let (records, stats) = parse_records(text).unwrap();
        assert_eq!(stats, ReadStats { rows: 1, skipped: 0 });
        assert_eq!(records[0].level_gap, 0);
        assert_eq!(records[0].record.spell, "Spirit of Oak");
        assert_eq!(records[0].record.outcome, Outcome::Success);
    }

    #[test]
    fn test_parse_by_header_name() {
        let text = "result,hits,spell,class,level,channeling skill,level gap\n\
                    failure,3,Gate,Wizard,20,75,\n\
                    SUCCESS,1,Gate,Wizard,60,200,36\n";
        let (records, _) = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.skill, 75);
        assert_eq!(records[0].record.outcome, Outcome::Failure);
        assert_eq!(records[0].level_gap, 0, "blank gap reads as zero");
        assert_eq!(records[1].record.outcome, Outcome::Success);
        assert_eq!(records[1].level_gap, 36);
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        let text = "channeling skill,level,class,spell,hits,result,level gap\n\
                    abc,40,Druid,Gate,2,Success,0\n\
                    120,40,Druid,Gate\n\
                    120,40,Druid,Gate,2,Success,x\n\
                    120,40,Druid,Gate,2,Success,0\n";
        let (records, stats) = parse_records(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(stats, ReadStats { rows: 4, skipped: 3 });
    }

    #[test]
    fn test_parse_header_problems() {
        assert_eq!(parse_records("").unwrap_err(), HeaderProblem::Empty);
        assert_eq!(
            parse_records("channeling skill,level,class,spell,result\n").unwrap_err(),
            HeaderProblem::MissingColumn(HITS_COLUMN)
        );
    }

    #[test]
    fn test_enriched_output_reads_back() {
        let record = CastAttemptRecord {
            skill: 5,
            level: 60,
            class: "Shadow Knight".to_string(),
            spell: "Spirit of Wolf, Improved".to_string(),
            hits: 4,
            outcome: Outcome::Failure,
            provenance: None,
        };
        let mut out = Vec::new();
        write_enriched(&mut out, &[EnrichedRecord::new(record.clone(), 12)]).unwrap();

        let (records, _) = parse_records(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(records, vec![EnrichedRecord::new(record, 12)]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_read_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            read_records(&missing),
            Err(StorageError::Io { .. })
        ));

        let empty = dir.path().join("empty.csv");
        fs::write(&empty, "").unwrap();
        assert!(matches!(
            read_records(&empty),
            Err(StorageError::MissingHeader { .. })
        ));
    }

    #[test]
    fn test_read_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channeling_data.csv");
        let record = CastAttemptRecord {
            skill: 1,
            level: 2,
            class: "Cleric".to_string(),
            spell: "Courage".to_string(),
            hits: 1,
            outcome: Outcome::Success,
            provenance: None,
        };
        write_raw_file(&path, std::slice::from_ref(&record)).unwrap();

        let (records, stats) = read_raw_records(&path).unwrap();
        assert_eq!(records, vec![record]);
        assert_eq!(stats.skipped, 0);
    }
}
