use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use eqchannel_types::formatting::{pad_left, rule, table_row};

use crate::record::CastAttemptRecord;

/// Where a successful cast was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessInstance {
    pub file_name: Arc<str>,
    pub line_number: u64,
}

/// Successful casts grouped by hit count, with their source locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxHitsReport {
    by_hits: BTreeMap<u32, Vec<SuccessInstance>>,
}

impl MaxHitsReport {
    /// Records without provenance or with a failed outcome are ignored.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CastAttemptRecord>) -> Self {
        let mut by_hits: BTreeMap<u32, Vec<SuccessInstance>> = BTreeMap::new();
        for record in records {
            if !record.outcome.is_success() {
                continue;
            }
            let Some(provenance) = &record.provenance else {
                continue;
            };
            by_hits.entry(record.hits).or_default().push(SuccessInstance {
                file_name: Arc::clone(&provenance.file_name),
                line_number: provenance.line_number,
            });
        }
        Self { by_hits }
    }

    /// Highest hit count survived, with every instance of it.
    pub fn max(&self) -> Option<(u32, &[SuccessInstance])> {
        self.by_hits
            .last_key_value()
            .map(|(hits, instances)| (*hits, instances.as_slice()))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Max Hits on Success Report ===");
        let _ = writeln!(out);

        let Some((max_hits, instances)) = self.max() else {
            let _ = writeln!(out, "No successful casts with hits were found in the logs.");
            return out;
        };

        let _ = writeln!(
            out,
            "Maximum hits taken during a successful cast: {max_hits}"
        );
        let _ = writeln!(out, "Total instances of this occurring: {}", instances.len());
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            table_row(&[pad_left("Filename", 35), "Line Number".to_string()])
        );
        let _ = writeln!(out, "{}", rule(50));
        for instance in instances {
            let _ = writeln!(
                out,
                "{}",
                table_row(&[
                    pad_left(&instance.file_name, 35),
                    instance.line_number.to_string(),
                ])
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Outcome, Provenance};

    fn make_record(file: &str, line: u64, hits: u32, outcome: Outcome) -> CastAttemptRecord {
        CastAttemptRecord {
            skill: 10,
            level: 10,
            class: "Wizard".to_string(),
            spell: "Gate".to_string(),
            hits,
            outcome,
            provenance: Some(Provenance {
                file_name: Arc::from(file),
                line_number: line,
            }),
        }
    }

    #[test]
    fn test_max_collects_all_instances() {
        let records = [
            make_record("eqlog_Alpha_pq.txt", 10, 3, Outcome::Success),
            make_record("eqlog_Alpha_pq.txt", 20, 5, Outcome::Failure),
            make_record("eqlog_Beta_pq.txt", 7, 3, Outcome::Success),
            make_record("eqlog_Beta_pq.txt", 9, 1, Outcome::Success),
        ];
        let report = MaxHitsReport::from_records(&records);
        let (hits, instances) = report.max().unwrap();

        assert_eq!(hits, 3, "failures do not count");
        assert_eq!(instances.len(), 2);
        assert_eq!(&*instances[1].file_name, "eqlog_Beta_pq.txt");
        assert_eq!(instances[1].line_number, 7);
    }

    #[test]
    fn test_records_without_provenance_ignored() {
        let mut record = make_record("x.txt", 1, 4, Outcome::Success);
        record.provenance = None;
        let report = MaxHitsReport::from_records(&[record]);
        assert!(report.max().is_none());
        assert!(report.render().contains("No successful casts"));
    }

    #[test]
    fn test_render_lists_instances() {
        let records = [make_record("eqlog_Alpha_pq.txt", 42, 2, Outcome::Success)];
        let text = MaxHitsReport::from_records(&records).render();
        assert!(text.contains("Maximum hits taken during a successful cast: 2"));
        assert!(text.contains("Total instances of this occurring: 1"));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("eqlog_Alpha_pq.txt"));
        assert!(last.ends_with("| 42"));
    }
}
