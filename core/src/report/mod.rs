//! Aggregations over cast attempt records and their text renderings.
//!
//! Each report is built once from records, then rendered to a `String`
//! with a [`NumberFormat`](eqchannel_types::NumberFormat). Rendering never
//! prints; the CLI decides where output goes.

mod by_hits;
mod calibration;
mod max_hits;
mod tally;

pub use by_hits::{HitBreakdown, HitRow};
pub use calibration::{Calibration, CalibrationBucket, ModelComparison, ModelScore};
pub use max_hits::{MaxHitsReport, SuccessInstance};
pub use tally::{HitTally, TallyRow};

/// Printed when a report has no records to aggregate.
pub const NO_DATA: &str = "No valid data found to process.";

/// Mean of `sum` over `count`, as a percentage. Zero when `count` is zero.
pub(crate) fn mean_pct(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64 * 100.0
    }
}
