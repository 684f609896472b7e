use std::fmt;
use std::sync::Arc;

/// How a recorded cast attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::Failure => "Failure",
        }
    }

    /// Lenient parse used by record readers: `success` (any case, trimmed)
    /// is a success, anything else a failure.
    pub fn from_field(field: &str) -> Self {
        if field.trim().eq_ignore_ascii_case("success") {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// 1.0 for success, 0.0 for failure (Brier scoring).
    pub fn as_f64(self) -> f64 {
        if self.is_success() { 1.0 } else { 0.0 }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record was resolved: file name and 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub file_name: Arc<str>,
    pub line_number: u64,
}

/// One channeling observation: a cast that took at least one hit and then
/// either held or was interrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastAttemptRecord {
    pub skill: u32,
    pub level: u32,
    pub class: String,
    pub spell: String,
    pub hits: u32,
    pub outcome: Outcome,
    /// Not persisted; `None` for records read back from storage.
    pub provenance: Option<Provenance>,
}

/// A record with the derived level-gap column appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub record: CastAttemptRecord,
    pub level_gap: u32,
}

impl EnrichedRecord {
    pub fn new(record: CastAttemptRecord, level_gap: u32) -> Self {
        Self { record, level_gap }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_field() {
        assert_eq!(Outcome::from_field("Success"), Outcome::Success);
        assert_eq!(Outcome::from_field("  success \r"), Outcome::Success);
        assert_eq!(Outcome::from_field("Failure"), Outcome::Failure);
        assert_eq!(Outcome::from_field("bogus"), Outcome::Failure);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Success.to_string(), "Success");
        assert_eq!(Outcome::Failure.to_string(), "Failure");
        assert_eq!(Outcome::Failure.as_f64(), 0.0);
    }
}
