// tests/intake_test.rs
//
// End-to-end tests of the intake front end, short of the workflow engine:
// the all-failed short circuit, the missing-query path, and the
// data-resolution failure path. The repo's own data/ and workflows/
// directories serve as the bundled resource root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pangolin::errors::PangolinError;
use pangolin::qc::QcThresholds;
use pangolin::run::{run, RunSettings};

// Helper function to create a FASTA file
fn create_fasta_file(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content.as_bytes())?;
    Ok(path)
}

fn settings(query: PathBuf, outdir: PathBuf) -> RunSettings {
    RunSettings {
        query,
        outdir: Some(outdir),
        outfile: None,
        data_dir: None,
        tempdir: None,
        no_temp: false,
        thresholds: QcThresholds::default(),
        threads: 1,
        legacy: false,
        include_putative: false,
        write_tree: false,
        panguilin: false,
        dry_run: false,
        verbose: false,
    }
}

#[test]
fn test_all_failed_qc_short_circuits_with_report() {
    let temp = tempfile::tempdir().unwrap();
    let query = create_fasta_file(
        temp.path(),
        "query.fasta",
        ">seq1 first\nACGTACGT\n>seq2, second\nACGT\n",
    )
    .unwrap();
    let outdir = temp.path().join("out");

    let code = run(&settings(query, outdir.clone())).unwrap();
    assert_eq!(code, 0);

    let report = fs::read_to_string(outdir.join("lineage_report.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[0],
        "taxon,lineage,probability,pangoLEARN_version,status,note"
    );
    // One row per rejected record, ids normalized, reasons carried.
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("seq1_first,None,0,"));
    assert!(lines[1].ends_with(",fail,seq_len:8"));
    assert!(lines[2].starts_with("seq2__second,None,0,"));
    assert!(lines[2].ends_with(",fail,seq_len:4"));
}

#[test]
fn test_custom_outfile_name() {
    let temp = tempfile::tempdir().unwrap();
    let query = create_fasta_file(temp.path(), "query.fasta", ">s\nACGT\n").unwrap();
    let outdir = temp.path().join("out");

    let mut s = settings(query, outdir.clone());
    s.outfile = Some("my_report.csv".to_owned());
    assert_eq!(run(&s).unwrap(), 0);
    assert!(outdir.join("my_report.csv").exists());
}

#[test]
fn test_missing_query_is_fatal_with_minus_one() {
    let temp = tempfile::tempdir().unwrap();
    let s = settings(
        temp.path().join("does_not_exist.fasta"),
        temp.path().join("out"),
    );

    let err = run(&s).unwrap_err();
    assert!(matches!(err, PangolinError::MissingInputFile(_)));
    assert_eq!(err.exit_code(), -1);
}

#[test]
fn test_missing_classifier_data_is_fatal_with_one() {
    let temp = tempfile::tempdir().unwrap();
    // A record that passes QC forces the run past the short circuit and
    // into artifact resolution against an empty data directory.
    let query = create_fasta_file(
        temp.path(),
        "query.fasta",
        &format!(">long\n{}\n", "ACGT".repeat(3000)),
    )
    .unwrap();
    let empty_data = temp.path().join("data");
    fs::create_dir_all(&empty_data).unwrap();

    let mut s = settings(query, temp.path().join("out"));
    s.data_dir = Some(empty_data);

    let err = run(&s).unwrap_err();
    assert!(matches!(err, PangolinError::DataResolutionFailure(_)));
    assert_eq!(err.exit_code(), 1);
    // The diagnostic names the missing artifact categories.
    let msg = err.to_string();
    assert!(msg.contains("trained model"), "diagnostic was: {msg}");
}

#[test]
fn test_legacy_mode_does_not_short_circuit_on_all_failed() {
    // Legacy mode has no classifier short circuit; with an empty legacy
    // data directory the run must fail at resolution instead of writing a
    // report.
    let temp = tempfile::tempdir().unwrap();
    let query = create_fasta_file(temp.path(), "query.fasta", ">s\nACGT\n").unwrap();
    let empty_data = temp.path().join("data");
    fs::create_dir_all(&empty_data).unwrap();

    let mut s = settings(query, temp.path().join("out"));
    s.legacy = true;
    s.data_dir = Some(empty_data);

    let err = run(&s).unwrap_err();
    assert!(matches!(err, PangolinError::DataResolutionFailure(_)));
    assert!(!temp.path().join("out").join("lineage_report.csv").exists());
}

#[test]
fn test_no_temp_keeps_intermediates_in_outdir() {
    let temp = tempfile::tempdir().unwrap();
    let query = create_fasta_file(
        temp.path(),
        "query.fasta",
        &format!(
            ">long\n{}\n>short\nACGT\n",
            "ACGT".repeat(3000)
        ),
    )
    .unwrap();
    let outdir = temp.path().join("out");
    let empty_data = temp.path().join("data");
    fs::create_dir_all(&empty_data).unwrap();

    let mut s = settings(query, outdir.clone());
    s.no_temp = true;
    s.data_dir = Some(empty_data);

    // Resolution fails against the empty data dir, but by then the QC
    // FASTA files have already been staged in the output directory.
    assert!(run(&s).is_err());
    assert!(outdir.join("query.post_qc.fasta").exists());
    assert!(outdir.join("query.failed_qc.fasta").exists());

    let failed = fs::read_to_string(outdir.join("query.failed_qc.fasta")).unwrap();
    assert!(failed.contains(">short fail=seq_len:4"));
}
