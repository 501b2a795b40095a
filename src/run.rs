// Pipeline orchestration
//
// Main entry point for a lineage-assignment run: QC the query, stage the
// intermediate FASTA files, resolve the data artifacts, assemble the engine
// configuration, and hand off to the workflow engine. Everything here is
// sequential and synchronous; the only parallelism is inside the engine,
// controlled by the cores parameter.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{ConfigInputs, RunConfig};
use crate::data::{self, ArtifactResolutionRequest, PipelineMode};
use crate::defaults::DEFAULT_OUTFILE;
use crate::engine::{self, EngineInvocation};
use crate::errors::{PangolinError, Result};
use crate::fasta_io;
use crate::model;
use crate::qc::{self, QcThresholds};
use crate::report;
use crate::resources::Resources;

/// Validated CLI inputs for one invocation.
#[derive(Debug)]
pub struct RunSettings {
    pub query: PathBuf,
    pub outdir: Option<PathBuf>,
    pub outfile: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub tempdir: Option<PathBuf>,
    pub no_temp: bool,
    pub thresholds: QcThresholds,
    pub threads: usize,
    pub legacy: bool,
    pub include_putative: bool,
    pub write_tree: bool,
    pub panguilin: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl RunSettings {
    pub fn mode(&self) -> PipelineMode {
        if self.legacy {
            PipelineMode::Legacy {
                include_putative: self.include_putative,
            }
        } else {
            PipelineMode::Classifier
        }
    }
}

/// Working directory for intermediate files, exclusively owned by one
/// invocation. The temp variant is cleaned up on drop; `--no-temp` keeps
/// everything in the output directory.
enum WorkDir {
    Temp(TempDir),
    Persistent(PathBuf),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Temp(dir) => dir.path(),
            WorkDir::Persistent(path) => path,
        }
    }
}

/// Run the whole front end, returning the process exit code.
pub fn run(settings: &RunSettings) -> Result<i32> {
    let resources = Resources::locate()?;
    let mode = settings.mode();

    let snakefile = resources.workflow_definition(mode)?;

    if !settings.query.exists() {
        return Err(PangolinError::MissingInputFile(settings.query.clone()));
    }
    log::info!("The query file is {}", settings.query.display());

    let outdir = prepare_outdir(settings.outdir.as_deref())?;
    let outfile = outdir.join(
        settings
            .outfile
            .as_deref()
            .unwrap_or(DEFAULT_OUTFILE),
    );

    let workdir = prepare_workdir(settings, &outdir)?;

    let data_dir = settings
        .data_dir
        .clone()
        .unwrap_or_else(|| resources.default_data_dir());
    let lineages_version = data::package_version(&data_dir, "lineages");
    let pangolearn_version = data::package_version(&data_dir, "pangoLEARN");

    // QC partition of the query records.
    let records = fasta_io::read_fasta(&settings.query)
        .map_err(|e| PangolinError::io(format!("cannot parse {}", settings.query.display()), e))?;
    let partition = qc::partition(records, &settings.thresholds);
    log::info!(
        "{} sequences passed qc, {} failed",
        partition.run.len(),
        partition.do_not_run.len()
    );

    // With nothing left to classify, the front end writes the report
    // itself and never starts the engine.
    if !settings.legacy && partition.run.is_empty() {
        report::write_failure_report(&outfile, &partition.do_not_run, &pangolearn_version)
            .map_err(|e| {
                PangolinError::io(format!("cannot write report {}", outfile.display()), e)
            })?;
        log::info!("Note: no query sequences have passed the qc");
        return Ok(0);
    }

    let post_qc_query = workdir.path().join("query.post_qc.fasta");
    fasta_io::write_fasta(&post_qc_query, &partition.run)
        .map_err(|e| PangolinError::io(format!("cannot write {}", post_qc_query.display()), e))?;
    let qc_fail = workdir.path().join("query.failed_qc.fasta");
    fasta_io::write_fasta(&qc_fail, &partition.do_not_run)
        .map_err(|e| PangolinError::io(format!("cannot write {}", qc_fail.display()), e))?;

    log::info!("Number of threads is {}", settings.threads);

    // Resolve the data artifacts; any missing role aborts here.
    log::info!("Looking in {} for data files...", data_dir.display());
    let artifacts = data::resolve(&ArtifactResolutionRequest {
        data_dir: data_dir.clone(),
        mode,
    })?;

    let mut config = RunConfig::assemble(
        ConfigInputs {
            query_fasta: post_qc_query,
            outdir: outdir.clone(),
            outfile: outfile.clone(),
            tempdir: workdir.path().to_owned(),
            qc_fail,
            lineages_version,
            pangolearn_version,
            resources: &resources,
        },
        &artifacts,
        settings.write_tree,
        settings.panguilin,
    );

    // A compressed classifier is inflated into the working directory and
    // the config rewritten to point at the copies.
    if let data::ArtifactPaths::Classifier {
        trained_model,
        header_file,
        ..
    } = &artifacts
    {
        let compressed = model::needs_decompression(trained_model).map_err(|e| {
            PangolinError::io(format!("cannot stat {}", trained_model.display()), e)
        })?;
        if compressed {
            let (model_path, headers_path) =
                model::decompress_into(trained_model, header_file, workdir.path()).map_err(
                    |e| PangolinError::io("cannot decompress model files".to_owned(), e),
                )?;
            config.replace_model_paths(model_path, headers_path);
        }
    }

    let configfile = workdir.path().join("config.json");
    config
        .write_json(&configfile)
        .map_err(|e| PangolinError::io(format!("cannot write {}", configfile.display()), e))?;

    let invocation = EngineInvocation {
        snakefile,
        workdir: workdir.path().to_owned(),
        configfile,
        cores: settings.threads,
        dry_run: settings.dry_run,
        quiet: !settings.verbose,
    };

    let success = engine::run(&invocation)?;
    Ok(if success { 0 } else { 1 })
}

/// Create the output directory if needed; defaults to the current working
/// directory.
fn prepare_outdir(outdir: Option<&Path>) -> Result<PathBuf> {
    match outdir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| PangolinError::DirectoryCreationFailure {
                path: dir.to_owned(),
                source,
            })?;
            Ok(dir.to_owned())
        }
        None => env::current_dir().map_err(|source| PangolinError::DirectoryCreationFailure {
            path: PathBuf::from("."),
            source,
        }),
    }
}

fn prepare_workdir(settings: &RunSettings, outdir: &Path) -> Result<WorkDir> {
    if settings.no_temp {
        log::info!(
            "--no-temp: All intermediate files will be written to {}",
            outdir.display()
        );
        return Ok(WorkDir::Persistent(outdir.to_owned()));
    }

    let tempdir = match &settings.tempdir {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| {
                PangolinError::DirectoryCreationFailure {
                    path: parent.clone(),
                    source,
                }
            })?;
            TempDir::new_in(parent)
        }
        None => TempDir::new(),
    }
    .map_err(|source| PangolinError::DirectoryCreationFailure {
        path: settings
            .tempdir
            .clone()
            .unwrap_or_else(env::temp_dir),
        source,
    })?;

    Ok(WorkDir::Temp(tempdir))
}
