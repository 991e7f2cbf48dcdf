//! Reads instance files and solver result directories from disk.

use crate::aggregation::{AggregationReport, ResultAggregator};
use crate::error::{AnalysisError, AnalysisResult};
use crate::instance::ProblemInstance;
use crate::instance_key::InstanceKey;
use crate::results::{InstanceResults, SolverResult};
use lirp_structs::config::{AnalysisConfig, SolverFilesConfig};
use lirp_structs::core::{InstanceFile, SolverResultFile};
use lirp_utils::dejsonify;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn parse_file<T: DeserializeOwned>(path: &Path) -> AnalysisResult<T> {
    let content = fs::read_to_string(path)?;
    dejsonify::<T>(&content).map_err(|source| AnalysisError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The instance is named after the file stem.
pub fn load_instance(path: &Path) -> AnalysisResult<ProblemInstance> {
    let file: InstanceFile = parse_file(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ProblemInstance::from_file(name, &file)
}

/// Subdirectories of `solutions_dir`, symlinks followed, sorted by name.
pub fn instance_dirs(solutions_dir: &Path) -> AnalysisResult<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(solutions_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let label = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        dirs.push((label, path));
    }
    dirs.sort();
    Ok(dirs)
}

pub fn load_instance_results(
    label: &str,
    dir: &Path,
    files: &SolverFilesConfig,
) -> AnalysisResult<InstanceResults> {
    let load = |file_name: &str| -> AnalysisResult<SolverResult> {
        let path = dir.join(file_name);
        if !path.is_file() {
            return Err(AnalysisError::MissingResult {
                instance: label.to_string(),
                path,
            });
        }
        let file: SolverResultFile = parse_file(&path)?;
        Ok(SolverResult::from(&file))
    };
    Ok(InstanceResults {
        label: label.to_string(),
        baseline: load(&files.baseline)?,
        split: load(&files.split)?,
        local_move: load(&files.local_move)?,
    })
}

/// Aggregates every instance directory under `solutions_dir`.
///
/// The first unreadable or invalid instance aborts the pass unless
/// `isolate_invalid_records` is set, in which case it is logged and skipped.
pub fn aggregate_directory(
    solutions_dir: &Path,
    config: &AnalysisConfig,
) -> AnalysisResult<AggregationReport> {
    let mut aggregator = ResultAggregator::new(config.aggregation.clone());
    let dirs = instance_dirs(solutions_dir)?;
    info!(
        "Found {} instance directories in {}",
        dirs.len(),
        solutions_dir.display()
    );
    for (label, dir) in dirs {
        if InstanceKey::parse(&label).is_none() {
            aggregator.skip(&label);
            continue;
        }
        let outcome = load_instance_results(&label, &dir, &config.solver_files)
            .and_then(|results| aggregator.ingest(&results));
        if let Err(e) = outcome {
            if config.aggregation.isolate_invalid_records {
                aggregator.reject(&label, &e);
            } else {
                return Err(e);
            }
        }
    }
    Ok(aggregator.finalize())
}
