use std::collections::BTreeMap;
use std::fmt::Write;

use eqchannel_types::NumberFormat;
use eqchannel_types::formatting::{
    format_bucket, format_decimal, format_pct, pad_left, pad_right, rule, table_row,
};

use super::{NO_DATA, mean_pct};
use crate::models::Model;
use crate::record::EnrichedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationBucket {
    pub count: u64,
    pub actual: u64,
    pub expected: f64,
}

impl CalibrationBucket {
    pub fn actual_pct(&self) -> f64 {
        mean_pct(self.actual as f64, self.count)
    }

    pub fn expected_pct(&self) -> f64 {
        mean_pct(self.expected, self.count)
    }
}

/// Outcomes grouped by predicted probability, rounded to the nearest tenth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibration {
    /// Keyed by tenths (0..=10).
    buckets: BTreeMap<u8, CalibrationBucket>,
}

impl Calibration {
    /// Bucket index for a probability in `[0, 1]`. Exact ties (0.25,
    /// 0.75, ...) go to the even tenth.
    pub fn bucket_of(probability: f64) -> u8 {
        (probability.clamp(0.0, 1.0) * 10.0).round_ties_even() as u8
    }

    pub fn add(&mut self, probability: f64, success: bool) {
        let bucket = self.buckets.entry(Self::bucket_of(probability)).or_default();
        bucket.count += 1;
        bucket.expected += probability;
        if success {
            bucket.actual += 1;
        }
    }

    /// Buckets in ascending order with their center probability.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, &CalibrationBucket)> {
        self.buckets
            .iter()
            .map(|(tenths, bucket)| (f64::from(*tenths) / 10.0, bucket))
    }

    pub fn render(&self, format: NumberFormat) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}",
            table_row(&[
                pad_left("Pred Prob", 10),
                pad_left("Count", 8),
                pad_left("Actual %", 10),
                pad_left("Expected %", 10),
            ])
        );
        let _ = writeln!(out, "{}", rule(47));
        for (center, bucket) in self.buckets() {
            let _ = writeln!(
                out,
                "{}",
                table_row(&[
                    pad_left(&format_bucket(center, format), 10),
                    pad_left(&bucket.count.to_string(), 8),
                    pad_right(&format_pct(bucket.actual_pct(), format), 9),
                    pad_right(&format_pct(bucket.expected_pct(), format), 9),
                ])
            );
        }
        out
    }
}

/// How well one model predicted a set of outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
    pub model: Model,
    pub total: u64,
    pub actual_successes: u64,
    pub expected_successes: f64,
    pub brier_sum: f64,
    pub calibration: Calibration,
}

impl ModelScore {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            total: 0,
            actual_successes: 0,
            expected_successes: 0.0,
            brier_sum: 0.0,
            calibration: Calibration::default(),
        }
    }

    pub fn add(&mut self, enriched: &EnrichedRecord) {
        let r = &enriched.record;
        let predicted = self
            .model
            .predict(r.skill, r.level, enriched.level_gap, r.hits);
        let actual = r.outcome.as_f64();

        self.total += 1;
        if r.outcome.is_success() {
            self.actual_successes += 1;
        }
        self.expected_successes += predicted;
        self.brier_sum += (predicted - actual).powi(2);
        self.calibration.add(predicted, r.outcome.is_success());
    }

    /// Mean squared error of the predictions. Lower is better.
    pub fn brier(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.brier_sum / self.total as f64
        }
    }

    pub fn actual_rate(&self) -> f64 {
        mean_pct(self.actual_successes as f64, self.total)
    }

    pub fn expected_rate(&self) -> f64 {
        mean_pct(self.expected_successes, self.total)
    }

    /// Absolute difference between actual and expected success rates, in
    /// percentage points.
    pub fn total_error(&self) -> f64 {
        (self.actual_rate() - self.expected_rate()).abs()
    }

    pub fn render(&self, format: NumberFormat) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "--- {} ---", self.model);
        let _ = writeln!(
            out,
            "Expected Successes:      {} ({})",
            format_decimal(self.expected_successes, 2, format),
            format_pct(self.expected_rate(), format)
        );
        let _ = writeln!(
            out,
            "Brier Score:             {}",
            format_decimal(self.brier(), 4, format)
        );
        let _ = writeln!(
            out,
            "Total Error:             {}",
            format_pct(self.total_error(), format)
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Calibration ({})", self.model);
        out.push_str(&self.calibration.render(format));
        out
    }
}

/// Scores for several models over the same records.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparison {
    pub total: u64,
    pub actual_successes: u64,
    pub scores: Vec<ModelScore>,
}

impl ModelComparison {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a EnrichedRecord>,
        models: &[Model],
    ) -> Self {
        let mut scores: Vec<ModelScore> = models.iter().copied().map(ModelScore::new).collect();
        let mut total = 0;
        let mut actual_successes = 0;

        for enriched in records {
            total += 1;
            if enriched.record.outcome.is_success() {
                actual_successes += 1;
            }
            for score in &mut scores {
                score.add(enriched);
            }
        }

        Self {
            total,
            actual_successes,
            scores,
        }
    }

    pub fn score(&self, model: Model) -> Option<&ModelScore> {
        self.scores.iter().find(|s| s.model == model)
    }

    pub fn actual_rate(&self) -> f64 {
        mean_pct(self.actual_successes as f64, self.total)
    }

    pub fn render(&self, format: NumberFormat) -> String {
        if self.total == 0 {
            return format!("{NO_DATA}\n");
        }

        let mut out = String::new();
        let _ = writeln!(out, "Total Events Evaluated:  {}", self.total);
        let _ = writeln!(
            out,
            "Actual Successes:        {} ({})",
            self.actual_successes,
            format_pct(self.actual_rate(), format)
        );

        for (i, score) in self.scores.iter().enumerate() {
            let _ = writeln!(out);
            if i > 0 {
                let _ = writeln!(out, "{}", "=".repeat(50));
                let _ = writeln!(out);
            }
            out.push_str(&score.render(format));
        }
        out
    }
}
