// Bundled resource location
//
// The workflow definitions and the fixed reference/variant files ship with
// the package rather than with the versioned data releases. The resource
// root defaults to the crate directory at build time; installs can point
// PANGOLIN_RESOURCE_DIR at wherever the files were staged.

use std::env;
use std::path::{Path, PathBuf};

use crate::data::PipelineMode;
use crate::errors::{PangolinError, Result};

#[path = "resources_test.rs"]
#[cfg(test)]
mod resources_test;

pub const RESOURCE_DIR_ENV: &str = "PANGOLIN_RESOURCE_DIR";

/// Absolute paths of the fixed files bundled with the package.
#[derive(Debug, Clone)]
pub struct Resources {
    pub reference_fasta: PathBuf,
    pub b117_variants: PathBuf,
    pub b1351_variants: PathBuf,
    pub p1_variants: PathBuf,
    pub p2_variants: PathBuf,
    root: PathBuf,
}

impl Resources {
    /// Locate the resource root and verify the fixed data files exist.
    pub fn locate() -> Result<Self> {
        let root = match env::var_os(RESOURCE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        };
        Self::at(root)
    }

    /// Build resources rooted at an explicit directory.
    pub fn at(root: PathBuf) -> Result<Self> {
        let resources = Self {
            reference_fasta: root.join("data").join("reference.fasta"),
            b117_variants: root.join("data").join("config_b.1.1.7.csv"),
            b1351_variants: root.join("data").join("config_b.1.351.csv"),
            p1_variants: root.join("data").join("config_p.1.csv"),
            p2_variants: root.join("data").join("config_p.2.csv"),
            root,
        };

        for path in [
            &resources.reference_fasta,
            &resources.b117_variants,
            &resources.b1351_variants,
            &resources.p1_variants,
            &resources.p2_variants,
        ] {
            if !path.exists() {
                return Err(PangolinError::MissingInputFile(path.clone()));
            }
        }

        Ok(resources)
    }

    /// Default data directory when `--data` is not given.
    pub fn default_data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Workflow definition for the selected pipeline mode.
    ///
    /// Fails with [`PangolinError::MissingWorkflowDefinition`] if the file
    /// is not on disk; without it the engine has nothing to execute.
    pub fn workflow_definition(&self, mode: PipelineMode) -> Result<PathBuf> {
        let name = match mode {
            PipelineMode::Legacy { .. } => "Snakefile",
            PipelineMode::Classifier => "pangolearn.smk",
        };
        let path = self.root.join("workflows").join(name);
        if path.exists() {
            log::info!("Found the workflow definition at {}", path.display());
            Ok(path)
        } else {
            Err(PangolinError::MissingWorkflowDefinition(path))
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
