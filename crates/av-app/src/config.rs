//! Harness configuration shared by every case.

use std::path::{Path, PathBuf};

use av_compare::PlotStyle;
use av_results::{LoadColumns, PolarColumns};
use av_script::{ExitPolicy, TemplateMode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// How the sweep analysis is handed to the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDriver {
    /// Build the model with one script, then run the templated control script.
    #[default]
    TemplatedScript,
    /// Append the analysis calls to the geometry script and run it once.
    ModelApi,
}

/// Harness settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Solver executable, resolved through `PATH` when not absolute.
    pub solver: PathBuf,
    pub output_dir: PathBuf,
    pub graphics_dir: PathBuf,
    /// Control script name inside `output_dir`.
    pub script: String,
    /// Copied to `output_dir/script` before a run. The bundled script is
    /// used when this is unset and the output directory has none.
    pub script_source: Option<PathBuf>,
    pub template: TemplateMode,
    pub exit_policy: ExitPolicy,
    pub analysis_driver: AnalysisDriver,
    pub polar: PolarColumns,
    pub load: LoadColumns,
    pub plot: PlotStyle,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            solver: PathBuf::from("vsp"),
            output_dir: PathBuf::from("output"),
            graphics_dir: PathBuf::from("graphics"),
            script: "runVSPAEROSweep.vspscript".to_string(),
            script_source: None,
            template: TemplateMode::default(),
            exit_policy: ExitPolicy::default(),
            analysis_driver: AnalysisDriver::default(),
            polar: PolarColumns::default(),
            load: LoadColumns::default(),
            plot: PlotStyle::default(),
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.script.trim().is_empty() {
            return Err(AppError::Config("script name is empty".to_string()));
        }
        if self.solver.as_os_str().is_empty() {
            return Err(AppError::Config("solver path is empty".to_string()));
        }
        self.plot.validate()?;
        Ok(())
    }

    pub fn script_path(&self) -> PathBuf {
        self.output_dir.join(&self.script)
    }
}

/// Load a config from YAML. Missing fields take their defaults.
pub fn load_config(path: &Path) -> AppResult<HarnessConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: HarnessConfig = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;
    config.validate()?;
    Ok(config)
}
