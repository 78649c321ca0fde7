//! av-compare: computed-vs-reference metrics and comparison plots.

pub mod band;
pub mod interp;
pub mod metrics;
pub mod plot;
pub mod reference;

pub use band::ToleranceBand;
pub use interp::Interp1d;
pub use metrics::*;
pub use plot::{
    CurveOverlay, MarkerKind, Panel, PlotStyle, RefLine, ReferenceTrace, Series, SweepPanels,
    render_curve_overlay, render_sweep_panels,
};
pub use reference::ReferenceSeries;

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Core(#[from] av_core::AvError),

    #[error("Duplicate abscissa {x} with differing ordinates")]
    DuplicateAbscissa { x: f64 },

    #[error("Unknown color `{0}`")]
    UnknownColor(String),

    #[error("Plot error: {0}")]
    Plot(String),
}
