//! Metrics and plots for each analysis of a case.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use av_compare::{
    CurveComparison, CurveOverlay, Interp1d, Panel, PlotStyle, RefLine, ReferenceSeries, ReferenceTrace,
    SampleOn, Series, SweepPanels, ToleranceBand, alpha_slope, compare_curves, default_cl_grid,
    moment_slope, render_curve_overlay, render_sweep_panels, slope_error, two_point_slope,
};
use av_core::{AvError, mean};
use av_results::{LoadDistributionResult, MetricRecord, PolarResult};
use tracing::{debug, info, warn};

use crate::case::{AnalysisDef, CaseDef, Iteration, LoadNormalization, MomentAxis};
use crate::error::{AppError, AppResult};
use crate::references::{ReferenceSet, ReferenceValue, ResolvedReference};

const COMPUTED_LABEL: &str = "VSPAERO";

/// Parsed solver outputs of one iteration.
#[derive(Debug, Clone)]
pub struct IterationOutput {
    pub iteration: Iteration,
    pub polar: PolarResult,
    pub load: Option<LoadDistributionResult>,
    pub solver_s: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub metrics: Vec<MetricRecord>,
    pub plots: Vec<PathBuf>,
}

pub struct EvalContext<'a> {
    pub case: &'a CaseDef,
    pub references: &'a ReferenceSet,
    pub graphics_dir: &'a Path,
    pub style: &'a PlotStyle,
}

impl EvalContext<'_> {
    /// Metrics carry an iteration label only when the case sweeps.
    fn tag(&self, label: &str) -> Option<String> {
        self.case.is_sweep().then(|| label.to_string())
    }

    fn series_label(&self, label: &str) -> String {
        if self.case.is_sweep() {
            label.to_string()
        } else {
            COMPUTED_LABEL.to_string()
        }
    }

    fn plot_path(&self, analysis: &AnalysisDef) -> PathBuf {
        self.graphics_dir
            .join(format!("{}_{}.svg", self.case.id, analysis.name()))
    }
}

pub fn evaluate_analysis(
    ctx: &EvalContext<'_>,
    analysis: &AnalysisDef,
    outputs: &[IterationOutput],
) -> AppResult<Evaluation> {
    let evaluation = match analysis {
        AnalysisDef::LiftCurve {
            references,
            sample_on,
            band,
        } => alpha_curve(
            ctx,
            analysis,
            outputs,
            references,
            *sample_on,
            *band,
            Coefficient::Lift,
        )?,
        AnalysisDef::MomentCurve {
            references,
            against: MomentAxis::Alpha,
            sample_on,
            band,
            ..
        } => alpha_curve(
            ctx,
            analysis,
            outputs,
            references,
            *sample_on,
            *band,
            Coefficient::Moment,
        )?,
        AnalysisDef::MomentCurve {
            references,
            against: MomentAxis::Cl,
            cl_grid,
            band,
            ..
        } => {
            let grid = cl_grid.clone().unwrap_or_else(default_cl_grid);
            moment_curve(ctx, analysis, outputs, references, &grid, *band)?
        }
        AnalysisDef::LoadDistribution {
            references,
            band,
            loading,
        } => load_distribution(ctx, analysis, outputs, references, *band, *loading)?,
        AnalysisDef::Tessellation {
            lift_slope,
            cl,
            cdi,
            runtime_panel,
        } => tessellation(ctx, analysis, outputs, [lift_slope, cl, cdi], *runtime_panel)?,
    };

    for m in &evaluation.metrics {
        if let Some(err) = m.error_percent {
            if !err.is_finite() {
                warn!(
                    analysis = %m.analysis,
                    metric = %m.name,
                    reference = m.reference_label.as_deref().unwrap_or("-"),
                    "non-finite percent error"
                );
                continue;
            }
            info!(
                analysis = %m.analysis,
                metric = %m.name,
                iteration = m.iteration.as_deref().unwrap_or("-"),
                reference = m.reference_label.as_deref().unwrap_or("-"),
                error_percent = format!("{err:.3}"),
                "comparison"
            );
        }
    }
    Ok(evaluation)
}

fn value_metric(analysis: &AnalysisDef, name: &str, iteration: Option<String>, value: f64) -> MetricRecord {
    MetricRecord {
        analysis: analysis.name().to_string(),
        name: name.to_string(),
        iteration,
        value,
        reference: None,
        reference_label: None,
        error_percent: None,
    }
}

/// A scalar compared with a reference value.
fn scalar_metric(
    analysis: &AnalysisDef,
    name: &str,
    iteration: Option<String>,
    value: f64,
    reference: &ResolvedReference,
    reference_value: f64,
) -> MetricRecord {
    MetricRecord {
        reference: Some(reference_value),
        reference_label: Some(reference.label.clone()),
        error_percent: Some(slope_error(value, reference_value)),
        ..value_metric(analysis, name, iteration, value)
    }
}

/// A curve comparison. The value is the mean absolute deviation.
fn curve_metric(
    analysis: &AnalysisDef,
    name: &str,
    iteration: Option<String>,
    reference: &ResolvedReference,
    cmp: &CurveComparison,
) -> MetricRecord {
    let deviations: Vec<f64> = cmp
        .computed
        .iter()
        .zip(&cmp.reference)
        .map(|(c, r)| (c - r).abs())
        .collect();
    MetricRecord {
        reference_label: Some(reference.label.clone()),
        error_percent: Some(cmp.error_percent),
        ..value_metric(analysis, name, iteration, mean(&deviations).unwrap_or(0.0))
    }
}

fn push_reference_trace(
    seen: &mut HashSet<String>,
    traces: &mut Vec<ReferenceTrace>,
    reference: &ResolvedReference,
    curve: &ReferenceSeries,
    band: Option<ToleranceBand>,
) {
    if seen.insert(reference.id.clone()) {
        traces.push(ReferenceTrace::new(
            Series::new(&reference.label, curve.x.clone(), curve.y.clone()),
            reference.band.or(band),
        ));
    }
}

/// Polar coefficient plotted against alpha.
#[derive(Debug, Clone, Copy)]
enum Coefficient {
    Lift,
    Moment,
}

impl Coefficient {
    fn values(self, polar: &PolarResult) -> &[f64] {
        match self {
            Coefficient::Lift => &polar.cl,
            Coefficient::Moment => &polar.cm,
        }
    }

    /// Metric names for the curve and its slope against alpha.
    fn metrics(self) -> (&'static str, &'static str) {
        match self {
            Coefficient::Lift => ("cl", "lift_slope"),
            Coefficient::Moment => ("cm", "cm_alpha"),
        }
    }

    fn y_label(self) -> &'static str {
        match self {
            Coefficient::Lift => "CL",
            Coefficient::Moment => "CM",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Coefficient::Lift => "lift curve",
            Coefficient::Moment => "pitching moment",
        }
    }
}

/// A coefficient against alpha: its slope per radian, and per reference a
/// curve error and a slope error. Slope references become lines through the
/// origin sampled at the computed alphas.
fn alpha_curve(
    ctx: &EvalContext<'_>,
    analysis: &AnalysisDef,
    outputs: &[IterationOutput],
    references: &[String],
    sample_on: SampleOn,
    band: Option<ToleranceBand>,
    coefficient: Coefficient,
) -> AppResult<Evaluation> {
    let mut out = Evaluation::default();
    let mut computed = Vec::new();
    let mut traces = Vec::new();
    let mut seen = HashSet::new();
    let (curve_metric_name, slope_metric_name) = coefficient.metrics();

    for o in outputs {
        let polar = &o.polar;
        let y = coefficient.values(polar);
        let label = o.iteration.label.as_str();
        let slope = alpha_slope(&polar.alpha, y)?;
        out.metrics
            .push(value_metric(analysis, slope_metric_name, ctx.tag(label), slope));
        computed.push(Series::new(
            ctx.series_label(label),
            polar.alpha.clone(),
            y.to_vec(),
        ));

        for r in ctx.references.for_iteration(references, label) {
            let r = r?;
            let curve = match &r.value {
                ReferenceValue::Curve(s) => s.clone(),
                ReferenceValue::Slope(a) => ReferenceSeries::from_slope(&r.label, *a, &polar.alpha),
                ReferenceValue::Scalar(_) => continue,
            };
            let cmp = compare_curves(&polar.alpha, y, &curve.x, &curve.y, sample_on)?;
            out.metrics
                .push(curve_metric(analysis, curve_metric_name, ctx.tag(label), r, &cmp));

            // Reference slope over the computed alpha points.
            let ref_slope = match r.value {
                ReferenceValue::Slope(a) => a,
                _ => {
                    let f = Interp1d::new(&curve.x, &curve.y)?;
                    alpha_slope(&polar.alpha, &f.sample(&polar.alpha))?
                }
            };
            out.metrics.push(scalar_metric(
                analysis,
                slope_metric_name,
                ctx.tag(label),
                slope,
                r,
                ref_slope,
            ));
            push_reference_trace(&mut seen, &mut traces, r, &curve, band);
        }
    }

    let overlay = CurveOverlay {
        title: format!("{}: {}", ctx.case.name, coefficient.title()),
        x_label: "Alpha (deg)".to_string(),
        y_label: coefficient.y_label().to_string(),
        computed,
        references: traces,
    };
    let path = ctx.plot_path(analysis);
    render_curve_overlay(&path, &overlay, ctx.style)?;
    out.plots.push(path);
    Ok(out)
}

fn moment_curve(
    ctx: &EvalContext<'_>,
    analysis: &AnalysisDef,
    outputs: &[IterationOutput],
    references: &[String],
    cl_grid: &[f64],
    band: Option<ToleranceBand>,
) -> AppResult<Evaluation> {
    let mut out = Evaluation::default();
    let mut computed = Vec::new();
    let mut traces = Vec::new();
    let mut seen = HashSet::new();

    for o in outputs {
        let polar = &o.polar;
        let label = o.iteration.label.as_str();
        let slope = moment_slope(&polar.cl, &polar.cm, cl_grid)?;
        out.metrics
            .push(value_metric(analysis, "moment_slope", ctx.tag(label), slope));
        computed.push(Series::new(
            ctx.series_label(label),
            polar.cl.clone(),
            polar.cm.clone(),
        ));

        for r in ctx.references.for_iteration(references, label) {
            let r = r?;
            let ReferenceValue::Curve(curve) = &r.value else {
                continue;
            };
            let ref_slope = moment_slope(&curve.x, &curve.y, cl_grid)?;
            out.metrics.push(scalar_metric(
                analysis,
                "moment_slope",
                ctx.tag(label),
                slope,
                r,
                ref_slope,
            ));
            push_reference_trace(&mut seen, &mut traces, r, curve, band);
        }
    }

    let overlay = CurveOverlay {
        title: format!("{}: pitching moment", ctx.case.name),
        x_label: "CL".to_string(),
        y_label: "CM".to_string(),
        computed,
        references: traces,
    };
    let path = ctx.plot_path(analysis);
    render_curve_overlay(&path, &overlay, ctx.style)?;
    out.plots.push(path);
    Ok(out)
}

/// Total CL at the load file's angle of attack, or at the last polar row
/// when the header has no `AoA`.
fn total_lift(polar: &PolarResult, load: &LoadDistributionResult) -> AppResult<f64> {
    let alpha = load.reference.get("AoA").or_else(|| polar.alpha.last().copied());
    let cl = alpha.and_then(|a| polar.cl_nearest(a)).ok_or(AvError::TooFewPoints {
        what: "polar rows for lift normalization",
        needed: 1,
        got: 0,
    })?;
    debug!(alpha = ?alpha, cl, "total lift for load normalization");
    Ok(cl)
}

fn load_distribution(
    ctx: &EvalContext<'_>,
    analysis: &AnalysisDef,
    outputs: &[IterationOutput],
    references: &[String],
    band: Option<ToleranceBand>,
    loading: LoadNormalization,
) -> AppResult<Evaluation> {
    let mut out = Evaluation::default();
    let mut computed = Vec::new();
    let mut traces = Vec::new();
    let mut seen = HashSet::new();
    let metric = loading.metric();

    for o in outputs {
        let label = o.iteration.label.as_str();
        let load = o.load.as_ref().ok_or_else(|| {
            AppError::Results(format!("no load distribution parsed for iteration {label}"))
        })?;
        let y = match loading {
            LoadNormalization::SectionCl => load.cl.clone(),
            LoadNormalization::SpanLoading => {
                let cref = ctx
                    .case
                    .flow
                    .ref_chord
                    .unwrap_or_else(|| o.iteration.wing.mean_geometric_chord());
                load.cl_c_over_cref(cref)
            }
            LoadNormalization::LiftNormalized => load.lift_normalized(total_lift(&o.polar, load)?)?,
        };
        computed.push(Series::new(
            ctx.series_label(label),
            load.span_station.clone(),
            y.clone(),
        ));

        for r in ctx.references.for_iteration(references, label) {
            let r = r?;
            let ReferenceValue::Curve(curve) = &r.value else {
                continue;
            };
            let cmp = compare_curves(
                &load.span_station,
                &y,
                &curve.x,
                &curve.y,
                SampleOn::Computed,
            )?;
            out.metrics
                .push(curve_metric(analysis, metric, ctx.tag(label), r, &cmp));
            push_reference_trace(&mut seen, &mut traces, r, curve, band);
        }
    }

    let overlay = CurveOverlay {
        title: format!("{}: spanwise load", ctx.case.name),
        x_label: "Span station".to_string(),
        y_label: loading.axis_label().to_string(),
        computed,
        references: traces,
    };
    let path = ctx.plot_path(analysis);
    render_curve_overlay(&path, &overlay, ctx.style)?;
    out.plots.push(path);
    Ok(out)
}

fn last(values: &[f64], what: &'static str) -> AppResult<f64> {
    values.last().copied().ok_or_else(|| {
        AvError::TooFewPoints {
            what,
            needed: 1,
            got: 0,
        }
        .into()
    })
}

/// Scalar metrics against the swept mesh parameter.
fn tessellation(
    ctx: &EvalContext<'_>,
    analysis: &AnalysisDef,
    outputs: &[IterationOutput],
    [slope_refs, cl_refs, cdi_refs]: [&Vec<String>; 3],
    runtime_panel: bool,
) -> AppResult<Evaluation> {
    let mut out = Evaluation::default();
    let mut x = Vec::with_capacity(outputs.len());
    let mut columns: [Vec<f64>; 3] = Default::default();
    let mut runtimes = Vec::with_capacity(outputs.len());
    let quantities = [("lift_slope", slope_refs), ("cl", cl_refs), ("cdi", cdi_refs)];

    for o in outputs {
        let polar = &o.polar;
        let label = o.iteration.label.as_str();
        x.push(o.iteration.swept_value.unwrap_or(o.iteration.index as f64));
        // CL and CDi at the last alpha point.
        let values = [
            two_point_slope(&polar.alpha, &polar.cl)?,
            last(&polar.cl, "cl")?,
            last(&polar.cdi, "cdi")?,
        ];
        for (((name, refs), value), column) in quantities.iter().zip(values).zip(&mut columns) {
            column.push(value);
            out.metrics
                .push(value_metric(analysis, name, ctx.tag(label), value));
            for r in ctx.references.for_iteration(refs, label) {
                let r = r?;
                if let Some(reference) = r.scalar() {
                    out.metrics.push(scalar_metric(
                        analysis,
                        name,
                        ctx.tag(label),
                        value,
                        r,
                        reference,
                    ));
                }
            }
        }
        runtimes.push(o.solver_s);
        out.metrics
            .push(value_metric(analysis, "solver_seconds", ctx.tag(label), o.solver_s));
    }

    let y_labels = ["dCL/dalpha (1/rad)", "CL", "CDi"];
    let mut panels = Vec::with_capacity(4);
    for ((values, y_label), (_, refs)) in columns.into_iter().zip(y_labels).zip(quantities) {
        let reference_lines = refs
            .iter()
            .map(|id| ctx.references.get(id))
            .filter_map(|r| match r {
                Ok(r) => r.scalar().map(|value| {
                    Ok(RefLine {
                        label: r.label.clone(),
                        value,
                        band: r.band,
                    })
                }),
                Err(e) => Some(Err(e)),
            })
            .collect::<AppResult<Vec<_>>>()?;
        panels.push(Panel {
            y_label: y_label.to_string(),
            values,
            reference_lines,
        });
    }
    if runtime_panel {
        panels.push(Panel {
            y_label: "Solver time (s)".to_string(),
            values: runtimes,
            reference_lines: Vec::new(),
        });
    }

    let parameter_label = ctx
        .case
        .sweep
        .as_ref()
        .map_or("Iteration", |s| s.parameter.axis_label());
    let sweep = SweepPanels {
        title: format!("{}: mesh sensitivity", ctx.case.name),
        parameter_label: parameter_label.to_string(),
        x,
        panels,
    };
    let path = ctx.plot_path(analysis);
    render_sweep_panels(&path, &sweep, ctx.style)?;
    out.plots.push(path);
    Ok(out)
}
