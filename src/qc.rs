// Sequence QC filter
//
// Partitions query records into the set worth attempting assignment on and
// the set that is not. A record fails on length first; the ambiguity check
// is only reached by records that are long enough, so at most one failure
// reason is ever recorded per record.

use crate::defaults::{DEFAULT_MAX_AMBIG, DEFAULT_MIN_LENGTH};

#[path = "qc_test.rs"]
#[cfg(test)]
mod qc_test;

/// A single query sequence, parsed from the input FASTA.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    /// Header line with spaces and commas replaced by underscores.
    pub id: String,
    /// Free text carried through to the outputs; QC failures append a
    /// ` fail=<reason>` token.
    pub description: String,
    pub seq: Vec<u8>,
}

impl SequenceRecord {
    /// Build a record from a raw FASTA header and sequence, normalizing
    /// the id so downstream tab-separated tools cannot split it.
    pub fn new(header: &str, seq: Vec<u8>) -> Self {
        let id = header.replace([' ', ','], "_");
        Self {
            id,
            description: header.to_owned(),
            seq,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Proportion of the sequence that is `N` (case-insensitive), rounded
    /// to two decimal places.
    pub fn ambiguous_fraction(&self) -> f64 {
        let n = self
            .seq
            .iter()
            .filter(|&&b| b == b'N' || b == b'n')
            .count();
        let frac = n as f64 / self.seq.len() as f64;
        (frac * 100.0).round() / 100.0
    }

    /// The `fail=<reason>` token from the description, if any.
    pub fn fail_reason(&self) -> Option<&str> {
        self.description
            .split(' ')
            .find_map(|tok| tok.strip_prefix("fail="))
    }
}

/// Outcome of screening a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum QcOutcome {
    Pass,
    FailTooShort { len: usize },
    FailTooAmbiguous { frac: f64 },
}

impl QcOutcome {
    /// Reason string recorded in the record description and the report.
    pub fn reason(&self) -> Option<String> {
        match self {
            QcOutcome::Pass => None,
            QcOutcome::FailTooShort { len } => Some(format!("seq_len:{}", len)),
            QcOutcome::FailTooAmbiguous { frac } => Some(format!("N_content:{}", frac)),
        }
    }
}

/// QC thresholds, both inclusive: a record exactly at `min_length` or
/// exactly at `max_ambig` passes.
#[derive(Debug, Clone, Copy)]
pub struct QcThresholds {
    pub min_length: usize,
    pub max_ambig: f64,
}

impl Default for QcThresholds {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_ambig: DEFAULT_MAX_AMBIG,
        }
    }
}

/// Records partitioned by QC, input order preserved within each list.
#[derive(Debug, Default)]
pub struct QcPartition {
    pub run: Vec<SequenceRecord>,
    pub do_not_run: Vec<SequenceRecord>,
}

/// Screen a single record. Length is checked first so an empty sequence
/// never reaches the ambiguity division.
pub fn screen(record: &SequenceRecord, thresholds: &QcThresholds) -> QcOutcome {
    if record.len() < thresholds.min_length {
        return QcOutcome::FailTooShort { len: record.len() };
    }
    let frac = record.ambiguous_fraction();
    if frac > thresholds.max_ambig {
        return QcOutcome::FailTooAmbiguous { frac };
    }
    QcOutcome::Pass
}

/// Partition records into run / do-not-run sets. Rejected records get the
/// failure reason appended to their description and are logged.
pub fn partition(
    records: impl IntoIterator<Item = SequenceRecord>,
    thresholds: &QcThresholds,
) -> QcPartition {
    let mut partition = QcPartition::default();

    for mut record in records {
        match screen(&record, thresholds) {
            QcOutcome::Pass => partition.run.push(record),
            outcome => {
                match &outcome {
                    QcOutcome::FailTooShort { .. } => {
                        log::info!("{}\tsequence too short", record.id);
                    }
                    QcOutcome::FailTooAmbiguous { frac } => {
                        log::info!("{}\thas an N content of {}", record.id, frac);
                    }
                    QcOutcome::Pass => unreachable!(),
                }
                // reason() is always Some for a failing outcome
                if let Some(reason) = outcome.reason() {
                    record.description.push_str(" fail=");
                    record.description.push_str(&reason);
                }
                partition.do_not_run.push(record);
            }
        }
    }

    partition
}
