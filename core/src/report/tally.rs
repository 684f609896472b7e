use std::collections::BTreeMap;
use std::fmt::Write;

use eqchannel_types::formatting::{pad_left, rule, table_row};

use crate::record::{CastAttemptRecord, Outcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyRow {
    pub successes: u64,
    pub failures: u64,
}

/// Success and failure counts per hit count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitTally {
    rows: BTreeMap<u32, TallyRow>,
}

impl HitTally {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CastAttemptRecord>) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record.hits, record.outcome);
        }
        tally
    }

    pub fn add(&mut self, hits: u32, outcome: Outcome) {
        let row = self.rows.entry(hits).or_default();
        match outcome {
            Outcome::Success => row.successes += 1,
            Outcome::Failure => row.failures += 1,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (u32, &TallyRow)> {
        self.rows.iter().map(|(hits, row)| (*hits, row))
    }

    pub fn total_successes(&self) -> u64 {
        self.rows.values().map(|r| r.successes).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.rows.values().map(|r| r.failures).sum()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Channeling Report ===");
        let _ = writeln!(
            out,
            "Total successful casts (while being hit): {}",
            self.total_successes()
        );
        let _ = writeln!(
            out,
            "Total interrupted casts (while being hit): {}",
            self.total_failures()
        );
        let _ = writeln!(out, "{}", rule(40));

        if self.rows.is_empty() {
            let _ = writeln!(out, "No hits during casting were found in the logs.");
            return out;
        }

        let _ = writeln!(
            out,
            "{}",
            table_row(&[
                pad_left("Hits Taken", 15),
                pad_left("Successful Casts", 20),
                pad_left("Failed Casts", 15),
            ])
        );
        let _ = writeln!(out, "{}", rule(55));
        for (hits, row) in self.rows() {
            let _ = writeln!(
                out,
                "{}",
                table_row(&[
                    pad_left(&hits.to_string(), 15),
                    pad_left(&row.successes.to_string(), 20),
                    pad_left(&row.failures.to_string(), 15),
                ])
            );
        }
        out
    }
}
