// Data artifact resolver
//
// Locates the versioned data-package files the workflow needs, by walking
// the data directory and matching filename suffixes/prefixes. Resolution is
// all-or-nothing: if any role is missing the run is aborted before the
// engine is ever invoked. First match per role wins; there is no duplicate
// detection, so a data directory with conflicting candidates is on the
// caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::defaults::UNKNOWN_VERSION;

#[path = "data_test.rs"]
#[cfg(test)]
mod data_test;

/// Which pipeline variant to resolve artifacts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Original phylogenetic assignment against a guide tree.
    Legacy { include_putative: bool },
    /// Decision-tree classifier assignment (the default).
    Classifier,
}

/// A resolution request: directory plus mode, no implicit state.
#[derive(Debug, Clone)]
pub struct ArtifactResolutionRequest {
    pub data_dir: PathBuf,
    pub mode: PipelineMode,
}

/// Resolved artifact paths, one variant per mode so each carries only the
/// fields it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactPaths {
    Legacy {
        representative_aln: PathBuf,
        guide_tree: PathBuf,
        lineages_csv: PathBuf,
    },
    Classifier {
        trained_model: PathBuf,
        header_file: PathBuf,
        lineages_csv: PathBuf,
    },
}

impl ArtifactPaths {
    pub fn lineages_csv(&self) -> &Path {
        match self {
            ArtifactPaths::Legacy { lineages_csv, .. }
            | ArtifactPaths::Classifier { lineages_csv, .. } => lineages_csv,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error(
        "didn't find appropriate files in {}: missing {}.\n\
         The trained model or lineages data package must be installed; \
         check your environment and the data directory.\n\
         If you've specified --include-putative, files must end in \
         putative.fasta / putative.fasta.treefile.",
        data_dir.display(),
        missing.join(", ")
    )]
    MissingArtifacts {
        data_dir: PathBuf,
        missing: Vec<String>,
    },

    #[error("cannot read data directory {}: {source}", data_dir.display())]
    Walk {
        data_dir: PathBuf,
        source: io::Error,
    },
}

/// Classifier artifact filenames are exact, versioned names shipped by the
/// model package.
const TRAINED_MODEL_FILE: &str = "decisionTree_v1.joblib";
const HEADER_FILE: &str = "decisionTreeHeaders_v1.joblib";
const METADATA_FILE: &str = "lineages.metadata.csv";

/// Resolve every artifact role for the requested mode.
///
/// Pure function of the request: walks `data_dir` recursively, assigns each
/// file to at most one role by suffix/prefix, and fails with the full list
/// of unresolved roles.
pub fn resolve(request: &ArtifactResolutionRequest) -> Result<ArtifactPaths, ResolutionError> {
    let files = walk(&request.data_dir).map_err(|source| ResolutionError::Walk {
        data_dir: request.data_dir.clone(),
        source,
    })?;

    match request.mode {
        PipelineMode::Legacy { include_putative } => {
            resolve_legacy(&request.data_dir, &files, include_putative)
        }
        PipelineMode::Classifier => resolve_classifier(&request.data_dir, &files),
    }
}

fn resolve_legacy(
    data_dir: &Path,
    files: &[PathBuf],
    include_putative: bool,
) -> Result<ArtifactPaths, ResolutionError> {
    // Putative lineage definitions live in separate files; the flag swaps
    // which suffix family is searched for, it does not merge them.
    let (aln_suffix, tree_suffix) = if include_putative {
        ("putative.fasta", "putative.fasta.treefile")
    } else {
        ("safe.fasta", "safe.fasta.treefile")
    };

    let mut representative_aln = None;
    let mut guide_tree = None;
    let mut lineages_csv = None;

    for path in files {
        let Some(name) = file_name(path) else {
            continue;
        };
        // The treefile suffix also ends with the alignment suffix, so it
        // must be matched first.
        if name.ends_with(tree_suffix) {
            guide_tree.get_or_insert_with(|| path.clone());
        } else if name.ends_with(aln_suffix) {
            representative_aln.get_or_insert_with(|| path.clone());
        } else if name.starts_with("lineages") && name.ends_with(".csv") {
            lineages_csv.get_or_insert_with(|| path.clone());
        }
    }

    let mut missing = Vec::new();
    if representative_aln.is_none() {
        missing.push(format!("sequence alignment (*{})", aln_suffix));
    }
    if guide_tree.is_none() {
        missing.push(format!("guide tree (*{})", tree_suffix));
    }
    if lineages_csv.is_none() {
        missing.push("lineages csv (lineages*.csv)".to_owned());
    }

    match (representative_aln, guide_tree, lineages_csv) {
        (Some(representative_aln), Some(guide_tree), Some(lineages_csv)) => {
            log::info!("Data files found");
            log::info!("Sequence alignment:\t{}", representative_aln.display());
            log::info!("Guide tree:\t\t{}", guide_tree.display());
            log::info!("Lineages csv:\t\t{}", lineages_csv.display());
            Ok(ArtifactPaths::Legacy {
                representative_aln,
                guide_tree,
                lineages_csv,
            })
        }
        _ => Err(ResolutionError::MissingArtifacts {
            data_dir: data_dir.to_owned(),
            missing,
        }),
    }
}

fn resolve_classifier(
    data_dir: &Path,
    files: &[PathBuf],
) -> Result<ArtifactPaths, ResolutionError> {
    let mut trained_model = None;
    let mut header_file = None;
    let mut lineages_csv = None;

    for path in files {
        match file_name(path) {
            Some(TRAINED_MODEL_FILE) => {
                trained_model.get_or_insert_with(|| path.clone());
            }
            Some(HEADER_FILE) => {
                header_file.get_or_insert_with(|| path.clone());
            }
            Some(METADATA_FILE) => {
                lineages_csv.get_or_insert_with(|| path.clone());
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    if trained_model.is_none() {
        missing.push(format!("trained model ({})", TRAINED_MODEL_FILE));
    }
    if header_file.is_none() {
        missing.push(format!("header file ({})", HEADER_FILE));
    }
    if lineages_csv.is_none() {
        missing.push(format!("lineages csv ({})", METADATA_FILE));
    }

    match (trained_model, header_file, lineages_csv) {
        (Some(trained_model), Some(header_file), Some(lineages_csv)) => {
            log::info!("Data files found");
            log::info!("Trained model:\t{}", trained_model.display());
            log::info!("Header file:\t{}", header_file.display());
            log::info!("Lineages csv:\t{}", lineages_csv.display());
            Ok(ArtifactPaths::Classifier {
                trained_model,
                header_file,
                lineages_csv,
            })
        }
        _ => Err(ResolutionError::MissingArtifacts {
            data_dir: data_dir.to_owned(),
            missing,
        }),
    }
}

/// Version string of a data package: the trimmed first line of
/// `<name>.version` anywhere under the data directory, or "unknown".
pub fn package_version(data_dir: &Path, package: &str) -> String {
    let version_file = format!("{}.version", package);

    let Ok(files) = walk(data_dir) else {
        return UNKNOWN_VERSION.to_owned();
    };

    files
        .iter()
        .find(|p| file_name(p) == Some(version_file.as_str()))
        .and_then(|p| fs::read_to_string(p).ok())
        .and_then(|s| s.lines().next().map(|l| l.trim().to_owned()))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_owned())
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Recursive directory walk, files only, deterministic order.
fn walk(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_into(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_into(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_into(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
