//! Run report storage.

use crate::types::RunReport;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

const REPORT_FILE: &str = "report.json";

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if root_dir.is_file() {
            return Err(ResultsError::InvalidPath {
                message: format!("{} is a file, not a directory", root_dir.display()),
            });
        }
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Reports live under `<output>/runs/<run_id>/`.
    pub fn for_output_dir(output_dir: &Path) -> ResultsResult<Self> {
        Self::new(output_dir.join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn report_path(&self, run_id: &str) -> PathBuf {
        self.run_dir(run_id).join(REPORT_FILE)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.report_path(run_id).exists()
    }

    pub fn save_report(&self, report: &RunReport) -> ResultsResult<PathBuf> {
        let run_dir = self.run_dir(&report.run_id);
        fs::create_dir_all(&run_dir)?;

        let path = run_dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load_report(&self, run_id: &str) -> ResultsResult<RunReport> {
        let path = self.report_path(run_id);

        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let report = serde_json::from_str(&content)?;
        Ok(report)
    }

    pub fn list_runs(&self, case_id: &str) -> ResultsResult<Vec<RunReport>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(report) = self.load_report(&run_id)
                    && report.case_id == case_id
                {
                    runs.push(report);
                }
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
