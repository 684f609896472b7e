//! Centralized number formatting for report tables.
//!
//! All numeric report output goes through this module to keep column widths
//! consistent across the report commands, and to support European-style
//! number formatting (swapping `.` and `,`).

use serde::{Deserialize, Serialize};

/// Decimal separator convention used when rendering reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    #[default]
    Standard,
    European,
}

impl NumberFormat {
    pub fn is_european(self) -> bool {
        matches!(self, NumberFormat::European)
    }
}

/// Swap `.` and `,` in a formatted string.
fn europeanize(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '.' => result.push(','),
            ',' => result.push('.'),
            _ => result.push(c),
        }
    }
    result
}

#[inline]
fn maybe_eu(s: String, format: NumberFormat) -> String {
    if format.is_european() {
        europeanize(&s)
    } else {
        s
    }
}

/// Format a percentage value with 2 decimal places.
///
/// # Examples
/// ```
/// use eqchannel_types::formatting::{format_pct, NumberFormat};
/// assert_eq!(format_pct(42.7, NumberFormat::Standard), "42.70%");
/// assert_eq!(format_pct(42.7, NumberFormat::European), "42,70%");
/// ```
pub fn format_pct(n: f64, format: NumberFormat) -> String {
    maybe_eu(format!("{:.2}%", n), format)
}

/// Format a percentage value with 1 decimal place (per-hit tables).
///
/// # Examples
/// ```
/// use eqchannel_types::formatting::{format_pct_short, NumberFormat};
/// assert_eq!(format_pct_short(42.76, NumberFormat::Standard), "42.8%");
/// ```
pub fn format_pct_short(n: f64, format: NumberFormat) -> String {
    maybe_eu(format!("{:.1}%", n), format)
}

/// Format a decimal number with the specified precision.
///
/// # Examples
/// ```
/// use eqchannel_types::formatting::{format_decimal, NumberFormat};
/// assert_eq!(format_decimal(0.12346, 4, NumberFormat::Standard), "0.1235");
/// assert_eq!(format_decimal(0.12346, 4, NumberFormat::European), "0,1235");
/// ```
pub fn format_decimal(n: f64, precision: usize, format: NumberFormat) -> String {
    maybe_eu(format!("{:.prec$}", n, prec = precision), format)
}

/// Format a calibration bucket label (`~ 0.30`).
///
/// # Examples
/// ```
/// use eqchannel_types::formatting::{format_bucket, NumberFormat};
/// assert_eq!(format_bucket(0.3, NumberFormat::Standard), "~ 0.30");
/// ```
pub fn format_bucket(bucket: f64, format: NumberFormat) -> String {
    format!("~ {}", format_decimal(bucket, 2, format))
}

/// Left-align `s` in a cell of `width` characters.
pub fn pad_left(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Right-align `s` in a cell of `width` characters.
pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// Horizontal rule used under table headers.
pub fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// Join cells with the ` | ` column separator.
pub fn table_row(cells: &[String]) -> String {
    cells.join(" | ")
}
