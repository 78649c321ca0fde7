//! Blocking invocation of the external solver.

use std::path::{Path, PathBuf};
use std::process::Command;

use av_core::timing::Timer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{ScriptError, ScriptResult};

/// What to do with a non-zero solver exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPolicy {
    /// Never look at the status; parsing decides whether the run worked.
    Ignore,
    /// Log a warning and carry on.
    #[default]
    Warn,
    /// Turn a non-zero status into an error.
    Strict,
}

/// `<binary> -script <script>` run from `working_dir`.
#[derive(Debug, Clone)]
pub struct SolverCommand {
    pub binary: PathBuf,
    pub script: String,
    pub working_dir: PathBuf,
    pub exit_policy: ExitPolicy,
}

/// Outcome of one solver invocation.
#[derive(Debug, Clone)]
pub struct SolverRun {
    pub code: Option<i32>,
    pub success: bool,
    pub elapsed_s: f64,
    pub stdout: String,
    pub stderr: String,
}

impl SolverCommand {
    pub fn new(binary: impl Into<PathBuf>, script: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            script: script.into(),
            working_dir: working_dir.into(),
            exit_policy: ExitPolicy::default(),
        }
    }

    pub fn with_exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    /// Run the solver and block until it exits. There is no timeout.
    pub fn run(&self) -> ScriptResult<SolverRun> {
        debug!(
            binary = %self.binary.display(),
            script = %self.script,
            cwd = %self.working_dir.display(),
            "launching solver"
        );
        let timer = Timer::start("solver");
        let output = Command::new(&self.binary)
            .arg("-script")
            .arg(&self.script)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| ScriptError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        let elapsed_s = timer.stop();

        let run = SolverRun {
            code: output.status.code(),
            success: output.status.success(),
            elapsed_s,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !run.success {
            match self.exit_policy {
                ExitPolicy::Ignore => {}
                ExitPolicy::Warn => warn!(
                    binary = %self.binary.display(),
                    code = ?run.code,
                    stderr = %run.stderr.trim(),
                    "solver exited with failure status"
                ),
                ExitPolicy::Strict => {
                    return Err(ScriptError::SolverFailed {
                        binary: self.binary.clone(),
                        code: run.code,
                    });
                }
            }
        }

        info!(elapsed_s = format!("{:.3}", run.elapsed_s), "solver finished");
        Ok(run)
    }
}

/// Files the solver writes next to the model, named after its base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub polar: PathBuf,
    pub load_distribution: PathBuf,
}

impl OutputFiles {
    pub const POLAR_SUFFIX: &'static str = "_DegenGeom.polar";
    pub const LOAD_SUFFIX: &'static str = "_DegenGeom.lod";

    pub fn for_model(dir: &Path, model_file: &str) -> Self {
        let base = Path::new(model_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| model_file.to_string());
        Self {
            polar: dir.join(format!("{base}{}", Self::POLAR_SUFFIX)),
            load_distribution: dir.join(format!("{base}{}", Self::LOAD_SUFFIX)),
        }
    }

    /// Delete outputs left behind by an earlier run.
    pub fn clear_stale(&self) -> ScriptResult<()> {
        for path in [&self.polar, &self.load_distribution] {
            match std::fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed stale output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(ScriptError::StaleOutput {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}
