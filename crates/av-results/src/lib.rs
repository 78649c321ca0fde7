//! av-results: solver output parsing and run report storage.

pub mod hash;
pub mod load_dist;
pub mod polar;
pub mod store;
pub mod table;
pub mod types;

pub use hash::compute_run_id;
pub use load_dist::{
    LoadColumns, LoadDistributionResult, ReferenceGeometry, parse_load_distribution,
    read_load_distribution,
};
pub use polar::{PolarColumns, PolarResult, parse_polar, read_polar};
pub use store::RunStore;
pub use table::{ColumnSpec, TableSpec, read_columns, read_columns_from_file};
pub use types::*;

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Line {line}, column {column}: cannot parse `{token}` as a number")]
    Parse {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("Line {line} has {width} columns, column {column} was requested")]
    MissingColumn {
        line: usize,
        column: usize,
        width: usize,
    },

    #[error("Header column {column}: expected `{expected}`, found `{found}`")]
    HeaderMismatch {
        column: usize,
        expected: String,
        found: String,
    },

    #[error("File ended after {got} of {needed} header lines")]
    Truncated { needed: usize, got: usize },

    #[error("Reference quantity `{name}` missing from the load distribution header")]
    MissingReference { name: String },

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
