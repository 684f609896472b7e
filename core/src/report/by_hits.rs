use std::collections::BTreeMap;
use std::fmt::Write;

use eqchannel_types::NumberFormat;
use eqchannel_types::formatting::{format_pct_short, pad_left, pad_right, rule, table_row};

use super::{NO_DATA, mean_pct};
use crate::models::Model;
use crate::record::EnrichedRecord;

/// Observed and predicted success for one hit count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitRow {
    pub total: u64,
    pub successes: u64,
    pub exponential_sum: f64,
    pub linear_sum: f64,
}

impl HitRow {
    pub fn actual_pct(&self) -> f64 {
        mean_pct(self.successes as f64, self.total)
    }

    pub fn exponential_pct(&self) -> f64 {
        mean_pct(self.exponential_sum, self.total)
    }

    pub fn linear_pct(&self) -> f64 {
        mean_pct(self.linear_sum, self.total)
    }
}

/// Per-hit-count comparison of both models against observed outcomes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitBreakdown {
    rows: BTreeMap<u32, HitRow>,
}

impl HitBreakdown {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a EnrichedRecord>) -> Self {
        let mut rows: BTreeMap<u32, HitRow> = BTreeMap::new();
        for enriched in records {
            let r = &enriched.record;
            let row = rows.entry(r.hits).or_default();
            row.total += 1;
            if r.outcome.is_success() {
                row.successes += 1;
            }
            row.exponential_sum +=
                Model::Exponential.predict(r.skill, r.level, enriched.level_gap, r.hits);
            row.linear_sum += Model::Linear.predict(r.skill, r.level, enriched.level_gap, r.hits);
        }
        Self { rows }
    }

    pub fn get(&self, hits: u32) -> Option<&HitRow> {
        self.rows.get(&hits)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, format: NumberFormat) -> String {
        if self.rows.is_empty() {
            return format!("{NO_DATA}\n");
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}",
            table_row(&[
                pad_left("Hits", 5),
                pad_left("Count", 6),
                pad_left("Actual %", 10),
                pad_left(&format!("{} %", Model::Exponential), 15),
                pad_left(&format!("{} %", Model::Linear), 15),
            ])
        );
        let _ = writeln!(out, "{}", rule(65));

        for (hits, row) in &self.rows {
            let _ = writeln!(
                out,
                "{}",
                table_row(&[
                    pad_left(&hits.to_string(), 5),
                    pad_left(&row.total.to_string(), 6),
                    pad_right(&format_pct_short(row.actual_pct(), format), 9),
                    pad_right(&format_pct_short(row.exponential_pct(), format), 14),
                    pad_right(&format_pct_short(row.linear_pct(), format), 14),
                ])
            );
        }
        out
    }
}
