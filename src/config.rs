// Run configuration assembly
//
// The workflow engine consumes a flat mapping of named parameters. This
// front end assembles the mapping once, serializes it to JSON in the temp
// directory, and never interprets the values again; the only invariant is
// that every key the selected workflow needs is present before invocation.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::data::ArtifactPaths;
use crate::defaults::{COMPRESSED_MODEL_SIZE, TRIM_END, TRIM_START};
use crate::resources::Resources;

#[path = "config_test.rs"]
#[cfg(test)]
mod config_test;

/// The flat configuration mapping handed to the workflow engine.
///
/// Immutable once assembled; mode-dependent keys are omitted from the
/// serialized form rather than written empty.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub query_fasta: PathBuf,
    pub outdir: PathBuf,
    pub outfile: PathBuf,
    pub tempdir: PathBuf,
    pub trim_start: u32,
    pub trim_end: u32,
    pub qc_fail: PathBuf,
    pub lineages_version: String,
    #[serde(rename = "pangoLEARN_version")]
    pub pangolearn_version: String,
    pub compressed_model_size: u64,

    // Legacy mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative_aln: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_tree: Option<PathBuf>,

    // Classifier mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_model: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_file: Option<PathBuf>,

    // Bundled resources
    pub reference_fasta: PathBuf,
    pub b117_variants: PathBuf,
    pub b1351_variants: PathBuf,
    pub p1_variants: PathBuf,
    pub p2_variants: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_tree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineages_csv: Option<PathBuf>,
}

/// Everything the run-independent part of the config is built from.
pub struct ConfigInputs<'a> {
    pub query_fasta: PathBuf,
    pub outdir: PathBuf,
    pub outfile: PathBuf,
    pub tempdir: PathBuf,
    pub qc_fail: PathBuf,
    pub lineages_version: String,
    pub pangolearn_version: String,
    pub resources: &'a Resources,
}

impl RunConfig {
    /// Assemble the full mapping from the QC outputs, the resolved
    /// artifacts, and the bundled resources.
    pub fn assemble(
        inputs: ConfigInputs<'_>,
        artifacts: &ArtifactPaths,
        write_tree: bool,
        panguilin: bool,
    ) -> Self {
        let (representative_aln, guide_tree, trained_model, header_file) = match artifacts {
            ArtifactPaths::Legacy {
                representative_aln,
                guide_tree,
                ..
            } => (
                Some(representative_aln.clone()),
                Some(guide_tree.clone()),
                None,
                None,
            ),
            ArtifactPaths::Classifier {
                trained_model,
                header_file,
                ..
            } => (
                None,
                None,
                Some(trained_model.clone()),
                Some(header_file.clone()),
            ),
        };

        Self {
            query_fasta: inputs.query_fasta,
            outdir: inputs.outdir,
            outfile: inputs.outfile,
            tempdir: inputs.tempdir,
            trim_start: TRIM_START,
            trim_end: TRIM_END,
            qc_fail: inputs.qc_fail,
            lineages_version: inputs.lineages_version,
            pangolearn_version: inputs.pangolearn_version,
            compressed_model_size: COMPRESSED_MODEL_SIZE,
            representative_aln,
            guide_tree,
            trained_model,
            header_file,
            reference_fasta: inputs.resources.reference_fasta.clone(),
            b117_variants: inputs.resources.b117_variants.clone(),
            b1351_variants: inputs.resources.b1351_variants.clone(),
            p1_variants: inputs.resources.p1_variants.clone(),
            p2_variants: inputs.resources.p2_variants.clone(),
            write_tree: write_tree.then(|| "True".to_owned()),
            lineages_csv: panguilin.then(|| artifacts.lineages_csv().to_owned()),
        }
    }

    /// Substitute decompressed model copies for the packaged ones.
    pub fn replace_model_paths(&mut self, trained_model: PathBuf, header_file: PathBuf) {
        self.trained_model = Some(trained_model);
        self.header_file = Some(header_file);
    }

    /// Serialize the mapping as JSON at `path` for the engine's
    /// `--configfile`.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
