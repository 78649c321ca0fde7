//! Case validation.

use std::collections::HashSet;

use crate::case::{AnalysisDef, CaseDef, MomentAxis, ReferenceData, SweepDef, SweepParameter};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Empty field: {field}")]
    EmptyField { field: String },

    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Length mismatch: {field} has {found} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Reference {id} cannot be used by {analysis}: {reason}")]
    IncompatibleReference {
        id: String,
        analysis: String,
        reason: String,
    },

    #[error("Wing {context}: {message}")]
    Wing { context: String, message: String },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    for (field, value) in [
        ("id", &case.id),
        ("name", &case.name),
        ("model_file", &case.model_file),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: field.to_string(),
            });
        }
    }

    case.wing.validate().map_err(|e| ValidationError::Wing {
        context: "base".to_string(),
        message: e.to_string(),
    })?;

    validate_flow(case)?;

    let iteration_labels = match &case.sweep {
        Some(sweep) => validate_sweep(case, sweep)?,
        None => vec![crate::case::BASE_ITERATION.to_string()],
    };

    let mut ids = HashSet::new();
    for reference in &case.references {
        if reference.id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "references.id".to_string(),
            });
        }
        if !ids.insert(reference.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: reference.id.clone(),
                context: "references".to_string(),
            });
        }
        if let Some(label) = &reference.iteration
            && !iteration_labels.contains(label)
        {
            return Err(ValidationError::MissingReference {
                id: label.clone(),
                context: format!("iteration of reference {}", reference.id),
            });
        }
        validate_reference_data(&reference.id, &reference.data)?;
    }

    // Plots are named after the analysis kind.
    let mut kinds = HashSet::new();
    for analysis in &case.analyses {
        if !kinds.insert(analysis.name()) {
            return Err(ValidationError::DuplicateId {
                id: analysis.name().to_string(),
                context: "analyses".to_string(),
            });
        }
        validate_analysis(case, analysis)?;
    }

    Ok(())
}

fn validate_flow(case: &CaseDef) -> Result<(), ValidationError> {
    let flow = &case.flow;
    if flow.alpha_npts == 0 {
        return Err(invalid("flow.alpha_npts", 0, "must be at least 1"));
    }
    for (field, v) in [
        ("flow.alpha_start", flow.alpha_start),
        ("flow.alpha_end", flow.alpha_end),
    ] {
        if !v.is_finite() {
            return Err(invalid(field, v, "must be finite"));
        }
    }
    if let crate::case::MachSpec::Velocity { speed_of_sound, .. } = flow.mach
        && (speed_of_sound.is_nan() || speed_of_sound <= 0.0)
    {
        return Err(invalid("flow.mach.speed_of_sound", speed_of_sound, "must be positive"));
    }
    let mach = flow.mach.mach();
    if !mach.is_finite() || mach < 0.0 {
        return Err(invalid("flow.mach", mach, "must be finite and non-negative"));
    }
    if let Some(chord) = flow.ref_chord
        && (!chord.is_finite() || chord <= 0.0)
    {
        return Err(invalid("flow.ref_chord", chord, "must be positive"));
    }
    Ok(())
}

/// Check the sweep and return its iteration labels.
fn validate_sweep(case: &CaseDef, sweep: &SweepDef) -> Result<Vec<String>, ValidationError> {
    if sweep.is_empty() {
        let field = match sweep.parameter {
            SweepParameter::Planform => "sweep.planforms",
            _ => "sweep.values",
        };
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }
    let n = sweep.len();

    if sweep.parameter == SweepParameter::Planform {
        if !sweep.values.is_empty() && sweep.values.len() != n {
            return Err(ValidationError::LengthMismatch {
                field: "sweep.values".to_string(),
                expected: n,
                found: sweep.values.len(),
            });
        }
    } else {
        for v in &sweep.values {
            if !v.is_finite() {
                return Err(invalid("sweep.values", v, "must be finite"));
            }
            if sweep.parameter.is_tessellation() && (v.fract() != 0.0 || *v < 2.0) {
                return Err(invalid("sweep.values", v, "tessellation must be an integer >= 2"));
            }
        }
    }

    for (field, len) in [
        ("sweep.labels", sweep.labels.len()),
        ("sweep.alpha_start", sweep.alpha_start.len()),
    ] {
        if len != 0 && len != n {
            return Err(ValidationError::LengthMismatch {
                field: field.to_string(),
                expected: n,
                found: len,
            });
        }
    }

    let iterations = case.iterations();
    let mut labels = HashSet::new();
    for it in &iterations {
        if !labels.insert(it.label.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: it.label.clone(),
                context: "sweep labels".to_string(),
            });
        }
        it.wing.validate().map_err(|e| ValidationError::Wing {
            context: it.label.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(iterations.into_iter().map(|it| it.label).collect())
}

fn validate_reference_data(id: &str, data: &ReferenceData) -> Result<(), ValidationError> {
    match data {
        ReferenceData::Inline { x, y } => {
            if x.len() != y.len() {
                return Err(ValidationError::LengthMismatch {
                    field: format!("references.{id}.y"),
                    expected: x.len(),
                    found: y.len(),
                });
            }
            if x.len() < 2 {
                return Err(invalid(
                    &format!("references.{id}.x"),
                    x.len(),
                    "needs at least 2 points",
                ));
            }
        }
        ReferenceData::File {
            path,
            x_column,
            y_column,
            ..
        } => {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::EmptyField {
                    field: format!("references.{id}.path"),
                });
            }
            if x_column == y_column {
                return Err(invalid(
                    &format!("references.{id}.y_column"),
                    y_column,
                    "must differ from x_column",
                ));
            }
        }
        ReferenceData::Slope { slope: v, .. } | ReferenceData::Scalar { value: v, .. } => {
            if !v.is_finite() {
                return Err(invalid(&format!("references.{id}"), v, "must be finite"));
            }
        }
    }
    Ok(())
}

fn validate_analysis(case: &CaseDef, analysis: &AnalysisDef) -> Result<(), ValidationError> {
    let name = analysis.name();
    for id in analysis.reference_ids() {
        let Some(reference) = case.reference(id) else {
            return Err(ValidationError::MissingReference {
                id: id.to_string(),
                context: format!("analysis {name}"),
            });
        };
        let slope_line = matches!(reference.data, ReferenceData::Slope { .. });
        let accepted = match analysis {
            AnalysisDef::LiftCurve { .. }
            | AnalysisDef::MomentCurve {
                against: MomentAxis::Alpha,
                ..
            } => reference.data.is_curve() || slope_line,
            AnalysisDef::MomentCurve { .. } | AnalysisDef::LoadDistribution { .. } => {
                reference.data.is_curve()
            }
            AnalysisDef::Tessellation { .. } => !reference.data.is_curve(),
        };
        if !accepted {
            return Err(ValidationError::IncompatibleReference {
                id: id.to_string(),
                analysis: name.to_string(),
                reason: "wrong kind of reference data".to_string(),
            });
        }
    }

    match analysis {
        AnalysisDef::LiftCurve { .. } | AnalysisDef::MomentCurve { .. }
            if case.flow.alpha_npts < 2 =>
        {
            Err(invalid(
                "flow.alpha_npts",
                case.flow.alpha_npts,
                "a slope needs at least 2 alpha points",
            ))
        }
        AnalysisDef::MomentCurve {
            cl_grid: Some(grid),
            ..
        } if grid.len() < 2 => Err(invalid("cl_grid", grid.len(), "needs at least 2 points")),
        AnalysisDef::Tessellation { .. } => {
            if case.flow.alpha_npts < 2 {
                return Err(invalid(
                    "flow.alpha_npts",
                    case.flow.alpha_npts,
                    "a two-point slope needs at least 2 alpha points",
                ));
            }
            match &case.sweep {
                Some(sweep) if sweep.parameter.is_tessellation() => Ok(()),
                _ => Err(invalid(
                    "analyses.tessellation",
                    "sweep",
                    "needs a chordwise or spanwise tessellation sweep",
                )),
            }
        }
        _ => Ok(()),
    }
}
