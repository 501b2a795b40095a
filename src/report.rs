// Short-circuit lineage report
//
// When every query record fails QC there is nothing for the engine to do,
// so the front end writes the final report itself: the fixed header plus
// one fail row per rejected record, then exits cleanly. In every other case
// the report is the engine's responsibility.

use csv::WriterBuilder;
use std::io;
use std::path::Path;

use crate::defaults::REPORT_HEADER;
use crate::qc::SequenceRecord;

#[path = "report_test.rs"]
#[cfg(test)]
mod report_test;

/// Write the all-failed report to `outfile`.
pub fn write_failure_report(
    outfile: &Path,
    rejected: &[SequenceRecord],
    pangolearn_version: &str,
) -> io::Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(outfile)
        .map_err(csv_to_io)?;

    writer.write_record(REPORT_HEADER).map_err(csv_to_io)?;
    for record in rejected {
        let reason = record.fail_reason().unwrap_or("");
        writer
            .write_record([
                record.id.as_str(),
                "None",
                "0",
                pangolearn_version,
                "fail",
                reason,
            ])
            .map_err(csv_to_io)?;
    }

    writer.flush()
}

fn csv_to_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => io_err,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
    }
}
