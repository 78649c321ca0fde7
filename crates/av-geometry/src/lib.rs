//! av-geometry: parametric wing definitions and the modeling API seam.
//!
//! The geometry tool itself is external. [`ModelApi`] is the capability
//! surface the harness consumes; [`GeometryBuilder`] turns a
//! [`WingParameters`] record into the sequence of API calls that builds and
//! saves the model.

pub mod api;
pub mod builder;
pub mod recording;
pub mod script_api;
pub mod wing;

pub use api::{AnalysisInput, GeomId, GeomKind, ModelApi, ParmValue, ResultId, WingDriver, XSecShape};
pub use builder::GeometryBuilder;
pub use recording::{ApiCall, RecordingModelApi};
pub use script_api::ScriptModelApi;
pub use wing::*;

pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("Invalid wing parameter: {field} = {value} ({reason})")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown geometry id: {0}")]
    UnknownGeom(String),

    #[error("Failed to write model script: {path}")]
    ScriptWrite {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
