//! Structured solver setup through the modeling API.
//!
//! Equivalent to the templated control script, but expressed as analysis
//! inputs instead of line edits.

use av_geometry::{AnalysisInput, ModelApi, ResultId};
use tracing::debug;

use crate::ScriptResult;
use crate::inputs::SweepInputs;

pub const COMPUTE_GEOMETRY: &str = "VSPAEROComputeGeometry";
pub const SWEEP: &str = "VSPAEROSweep";

/// Queue the DegenGeom computation and an alpha sweep on the current model.
///
/// Values missing from `inputs` keep the analysis defaults.
pub fn configure_sweep_analysis<A: ModelApi + ?Sized>(
    api: &mut A,
    inputs: &SweepInputs,
) -> ScriptResult<ResultId> {
    if let Some(file) = &inputs.model_file {
        api.read_model(file)?;
    }

    api.set_analysis_defaults(COMPUTE_GEOMETRY)?;
    api.set_analysis_input(
        COMPUTE_GEOMETRY,
        "AnalysisMethod",
        AnalysisInput::IntConstant("VORTEX_LATTICE".to_string()),
    )?;
    api.exec_analysis(COMPUTE_GEOMETRY)?;

    api.set_analysis_defaults(SWEEP)?;
    api.set_analysis_input(
        SWEEP,
        "AnalysisMethod",
        AnalysisInput::IntConstant("VORTEX_LATTICE".to_string()),
    )?;
    let doubles = [
        ("AlphaStart", inputs.alpha_start),
        ("AlphaEnd", inputs.alpha_end),
        ("MachStart", inputs.mach),
        ("Xcg", inputs.x_cg),
        ("Ycg", inputs.y_cg),
        ("Zcg", inputs.z_cg),
        ("cref", inputs.ref_chord),
    ];
    for (name, value) in doubles {
        if let Some(v) = value {
            api.set_analysis_input(SWEEP, name, AnalysisInput::Double(vec![v]))?;
        }
    }
    if let Some(n) = inputs.alpha_npts {
        api.set_analysis_input(SWEEP, "AlphaNpts", AnalysisInput::Int(vec![i64::from(n)]))?;
    }
    // Single Mach point.
    if inputs.mach.is_some() {
        api.set_analysis_input(SWEEP, "MachNpts", AnalysisInput::Int(vec![1]))?;
    }

    let result = api.exec_analysis(SWEEP)?;
    debug!(result = %result.0, "sweep analysis queued");
    Ok(result)
}
