//! Application service layer for aeroval.
//!
//! Case files describe one validation experiment each. This crate loads and
//! validates them, drives the geometry/template/solver/parse pipeline for
//! every sweep iteration, evaluates the requested analyses, and stores a
//! JSON report of the run. The CLI is a thin frontend over it.

pub mod case;
pub mod case_service;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod progress;
pub mod references;
pub mod run_service;
pub mod validate;

pub use case::{
    AnalysisDef, BASE_ITERATION, CaseDef, FlowConditions, Iteration, LoadNormalization, MachSpec,
    MomentAxis, ReferenceData, ReferenceDef, SweepDef, SweepParameter, ValueRange,
};
pub use case_service::{CaseSummary, list_cases, load_case, save_case, validate_case};
pub use config::{AnalysisDriver, HarnessConfig, load_config};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use references::ReferenceSet;
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, delete_run, list_runs, load_run, run_case,
    run_case_with_progress,
};
pub use validate::ValidationError;
