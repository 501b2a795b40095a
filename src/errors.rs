// Fatal error taxonomy
//
// Every error here is fatal and non-retried: a misconfigured environment
// cannot safely produce a partial lineage report, so the front end prints a
// human-readable diagnostic and terminates. QC rejection is deliberately
// not an error; rejected records are routed to their own report instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::ResolutionError;

#[derive(Debug, Error)]
pub enum PangolinError {
    #[error(
        "cannot find query (input) fasta file at {}\n\
         Please check the path to your fasta sequence file",
        .0.display()
    )]
    MissingInputFile(PathBuf),

    #[error("cannot find the workflow definition at {}", .0.display())]
    MissingWorkflowDefinition(PathBuf),

    #[error(transparent)]
    DataResolutionFailure(#[from] ResolutionError),

    #[error("cannot create directory {}: {source}", path.display())]
    DirectoryCreationFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("workflow engine failed to execute: {0}")]
    EngineExecutionFailure(std::io::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl PangolinError {
    /// Process exit status for this error.
    ///
    /// Argument and file-discovery problems exit with -1, matching the
    /// historical CLI contract; data-resolution and engine problems exit
    /// with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PangolinError::MissingInputFile(_)
            | PangolinError::MissingWorkflowDefinition(_)
            | PangolinError::DirectoryCreationFailure { .. } => -1,
            PangolinError::DataResolutionFailure(_)
            | PangolinError::EngineExecutionFailure(_)
            | PangolinError::Io { .. } => 1,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PangolinError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PangolinError>;
