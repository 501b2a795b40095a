// FASTA reader/writer module using bio::io::fasta
//
// This module wraps bio::io::fasta with:
// - Automatic gzip detection by file extension
// - Conversion to our SequenceRecord (header normalization happens there)
//
// Malformed FASTA is surfaced as an io::Error from the underlying parser;
// this front end does not try to repair input.

use bio::io::fasta;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::qc::SequenceRecord;

#[path = "fasta_io_test.rs"]
#[cfg(test)]
mod fasta_io_test;

/// Read all records from a FASTA file (auto-detects gzip by .gz extension).
pub fn read_fasta(path: &Path) -> io::Result<Vec<SequenceRecord>> {
    let file = File::open(path)?;

    let reader: Box<dyn Read> = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut records = Vec::new();
    for result in fasta::Reader::new(reader).records() {
        let record = result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Reconstruct the full header line; bio splits it at the first space.
        let header = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_owned(),
        };

        records.push(SequenceRecord::new(&header, record.seq().to_vec()));
    }

    Ok(records)
}

/// Write records to a FASTA file at `path`.
///
/// The normalized id is used as the header; a `fail=` token, when present,
/// is carried as the description so the reason survives into the
/// intermediate files.
pub fn write_fasta(path: &Path, records: &[SequenceRecord]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = fasta::Writer::new(file);

    for record in records {
        writer.write(
            &record.id,
            record.fail_reason().map(|r| format!("fail={}", r)).as_deref(),
            &record.seq,
        )?;
    }

    writer.flush()
}
