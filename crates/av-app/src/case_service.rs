//! Case loading, saving, validation, and listing.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::case::CaseDef;
use crate::error::{AppError, AppResult};

/// Summary of a case for listing.
#[derive(Debug, Clone)]
pub struct CaseSummary {
    pub path: PathBuf,
    pub id: String,
    pub name: String,
    pub iterations: usize,
    pub analyses: Vec<&'static str>,
}

/// Load a case from a YAML file.
pub fn load_case(path: &Path) -> AppResult<CaseDef> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::CaseFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut case: CaseDef = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Case(format!("Failed to parse case YAML: {}", e)))?;
    if let Some(sweep) = case.sweep.as_mut() {
        sweep.expand_range()?;
    }

    Ok(case)
}

/// Save a case to a YAML file.
pub fn save_case(path: &Path, case: &CaseDef) -> AppResult<()> {
    let content = serde_yaml::to_string(case)
        .map_err(|e| AppError::Case(format!("Failed to serialize case: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::CaseFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

pub fn validate_case(case: &CaseDef) -> AppResult<()> {
    crate::validate::validate_case(case)?;
    Ok(())
}

pub fn summarize(path: &Path, case: &CaseDef) -> CaseSummary {
    CaseSummary {
        path: path.to_path_buf(),
        id: case.id.clone(),
        name: case.name.clone(),
        iterations: case.sweep.as_ref().map_or(1, |s| s.len()),
        analyses: case.analyses.iter().map(|a| a.name()).collect(),
    }
}

/// Every `.yaml`/`.yml` case in `dir`, sorted by path. Files that fail to
/// parse are logged and skipped.
pub fn list_cases(dir: &Path) -> AppResult<Vec<CaseSummary>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    paths.sort();

    let mut cases = Vec::new();
    for path in paths {
        match load_case(&path) {
            Ok(case) => cases.push(summarize(&path, &case)),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping file"),
        }
    }
    Ok(cases)
}
