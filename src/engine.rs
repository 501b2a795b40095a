// Workflow engine invocation
//
// The classification DAG itself runs in snakemake, invoked here as a
// subprocess. Its scheduling semantics are a black box to this front end;
// all we do is hand over the workflow definition, the config file, and the
// run flags, then translate its exit status into a boolean.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{PangolinError, Result};

#[path = "engine_test.rs"]
#[cfg(test)]
mod engine_test;

/// How the engine should be run for one invocation.
#[derive(Debug, Clone)]
pub struct EngineInvocation {
    pub snakefile: PathBuf,
    pub workdir: PathBuf,
    pub configfile: PathBuf,
    pub cores: usize,
    pub dry_run: bool,
    pub quiet: bool,
}

impl EngineInvocation {
    /// The argument vector handed to the engine binary.
    ///
    /// Every run is forced and incomplete runs are rerun: the temp work
    /// directory is owned by this invocation, so there is never a previous
    /// result worth keeping.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--snakefile".to_owned(),
            self.snakefile.display().to_string(),
            "--directory".to_owned(),
            self.workdir.display().to_string(),
            "--configfile".to_owned(),
            self.configfile.display().to_string(),
            "--cores".to_owned(),
            self.cores.to_string(),
            "--forceall".to_owned(),
            "--rerun-incomplete".to_owned(),
            "--nolock".to_owned(),
            "--printshellcmds".to_owned(),
        ];
        if self.quiet {
            args.push("--quiet".to_owned());
        }
        if self.dry_run {
            args.push("--dryrun".to_owned());
        }
        args
    }
}

/// Run the engine and report whether it succeeded.
///
/// A spawn failure (engine not installed, not on PATH) is an
/// [`PangolinError::EngineExecutionFailure`]; a clean run that exits
/// non-zero is `Ok(false)`.
pub fn run(invocation: &EngineInvocation) -> Result<bool> {
    run_with_binary(Path::new("snakemake"), invocation)
}

pub fn run_with_binary(binary: &Path, invocation: &EngineInvocation) -> Result<bool> {
    log::info!("Running the workflow engine: {}", binary.display());
    log::debug!("Engine arguments: {:?}", invocation.to_args());

    let status = Command::new(binary)
        .args(invocation.to_args())
        .status()
        .map_err(PangolinError::EngineExecutionFailure)?;

    Ok(status.success())
}
