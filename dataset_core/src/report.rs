// Per-line outcomes and the batch report built from them

use std::fmt;

use serde::Serialize;

use crate::writer::Sample;

/// Why a transcript line produced no sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than two `|`/`,` separated fields.
    NoFields,
    /// None of the candidate audio paths exists.
    Unresolved,
    /// Audio decoded but its duration is outside the accepted window.
    BadDuration,
    /// Audio could not be decoded.
    DecodeError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Accepted(Sample),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepareReport {
    pub accepted: u64,
    pub skipped_no_fields: u64,
    pub skipped_unresolved: u64,
    pub skipped_bad_duration: u64,
    pub skipped_decode_error: u64,
}

impl PrepareReport {
    pub fn record(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Accepted(_) => self.accepted += 1,
            LineOutcome::Skipped(SkipReason::NoFields) => self.skipped_no_fields += 1,
            LineOutcome::Skipped(SkipReason::Unresolved) => self.skipped_unresolved += 1,
            LineOutcome::Skipped(SkipReason::BadDuration) => self.skipped_bad_duration += 1,
            LineOutcome::Skipped(SkipReason::DecodeError) => self.skipped_decode_error += 1,
        }
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_no_fields
            + self.skipped_unresolved
            + self.skipped_bad_duration
            + self.skipped_decode_error
    }

    pub fn total(&self) -> u64 {
        self.accepted + self.skipped()
    }
}

impl fmt::Display for PrepareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted, {} skipped (no fields: {}, unresolved: {}, bad duration: {}, decode error: {})",
            self.accepted,
            self.skipped(),
            self.skipped_no_fields,
            self.skipped_unresolved,
            self.skipped_bad_duration,
            self.skipped_decode_error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_record_counts_each_reason() {
        let mut report = PrepareReport::default();
        report.record(&LineOutcome::Skipped(SkipReason::NoFields));
        report.record(&LineOutcome::Skipped(SkipReason::Unresolved));
        report.record(&LineOutcome::Skipped(SkipReason::Unresolved));
        report.record(&LineOutcome::Skipped(SkipReason::DecodeError));
        report.record(&LineOutcome::Accepted(Sample {
            audio_path: PathBuf::from("/out/f5_a.wav"),
            file_name: "f5_a.wav".into(),
            text: "a".into(),
            duration: 1.0,
        }));

        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped_unresolved, 2);
        assert_eq!(report.skipped_bad_duration, 0);
        assert_eq!(report.skipped(), 4);
        assert_eq!(report.total(), 5);
        assert!(report.to_string().starts_with("1 accepted, 4 skipped"));
    }
}
