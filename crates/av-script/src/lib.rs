//! av-script: solver control-script templating and solver invocation.

pub mod analysis;
pub mod inputs;
pub mod invoker;
pub mod template;

pub use analysis::configure_sweep_analysis;
pub use inputs::{ScriptVar, SweepInputs};
pub use invoker::{ExitPolicy, OutputFiles, SolverCommand, SolverRun};
pub use template::{LineLayout, SweepTemplate, TemplateMode, template_file};

use std::path::PathBuf;

pub type ScriptResult<T> = Result<T, ScriptError>;

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write script: {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Line {index} is out of range (script has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    #[error("Line {index} does not declare `{expected}`: found `{found}`")]
    LayoutMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Variable `{name}` is not declared in the script")]
    VariableNotFound { name: String },

    #[error("Failed to launch solver `{binary}`")]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("Solver `{binary}` exited with status {code:?}")]
    SolverFailed { binary: PathBuf, code: Option<i32> },

    #[error("Failed to remove stale output: {path}")]
    StaleOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Model API error: {0}")]
    Model(#[from] av_geometry::GeometryError),
}
