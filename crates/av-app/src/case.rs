//! Case file schema: one validation experiment per YAML document.

use std::path::PathBuf;

use av_compare::{SampleOn, ToleranceBand};
use av_core::arange;
use av_geometry::{Planform, WingParameters};
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Label given to the only iteration of a case without a sweep.
pub const BASE_ITERATION: &str = "base";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Model file written by the geometry step; also names the solver outputs.
    pub model_file: String,
    pub wing: WingParameters,
    pub flow: FlowConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepDef>,
    #[serde(default)]
    pub analyses: Vec<AnalysisDef>,
    #[serde(default)]
    pub references: Vec<ReferenceDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConditions {
    pub alpha_start: f64,
    pub alpha_end: f64,
    pub alpha_npts: u32,
    pub mach: MachSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cg: Option<CgLocation>,
    /// Reference chord; the wing's mean geometric chord when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_chord: Option<f64>,
}

/// Either a Mach number or the freestream and sound speeds it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MachSpec {
    Value(f64),
    Velocity { v_inf: f64, speed_of_sound: f64 },
}

impl MachSpec {
    pub fn mach(&self) -> f64 {
        match *self {
            MachSpec::Value(m) => m,
            MachSpec::Velocity {
                v_inf,
                speed_of_sound,
            } => v_inf / speed_of_sound,
        }
    }
}

/// Named longitudinal stations on the wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    RootQuarterChord,
    MgcQuarterChord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Station {
    Value(f64),
    Anchor(Anchor),
}

impl Station {
    pub fn resolve(&self, wing: &WingParameters) -> f64 {
        match *self {
            Station::Value(v) => v,
            Station::Anchor(Anchor::RootQuarterChord) => wing.planform.root_chord() / 4.0,
            Station::Anchor(Anchor::MgcQuarterChord) => wing.mgc_quarter_chord_x(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CgLocation {
    pub x: Station,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl CgLocation {
    pub fn resolve(&self, wing: &WingParameters) -> (f64, f64, f64) {
        (self.x.resolve(wing), self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    Twist,
    ChordwiseTess,
    SpanwiseTess,
    Planform,
}

impl SweepParameter {
    pub fn axis_label(self) -> &'static str {
        match self {
            SweepParameter::Twist => "Twist (deg)",
            SweepParameter::ChordwiseTess => "Chordwise tessellation",
            SweepParameter::SpanwiseTess => "Spanwise tessellation",
            SweepParameter::Planform => "Variant",
        }
    }

    pub fn is_tessellation(self) -> bool {
        matches!(self, SweepParameter::ChordwiseTess | SweepParameter::SpanwiseTess)
    }

    fn key(self) -> &'static str {
        match self {
            SweepParameter::Twist => "twist",
            SweepParameter::ChordwiseTess => "chordwise_tess",
            SweepParameter::SpanwiseTess => "spanwise_tess",
            SweepParameter::Planform => "planform",
        }
    }
}

/// A labelled planform for a `planform` sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPlanform {
    pub label: String,
    pub planform: Planform,
}

/// `[start, stop)` stepped by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

/// One-parameter sweep over the base wing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDef {
    pub parameter: SweepParameter,
    /// Swept values. Optional for planform sweeps, where they only set the
    /// plot abscissa.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
    /// Stepped alternative to `values`, expanded when the case is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planforms: Vec<NamedPlanform>,
    /// Iteration labels, used to attach references to iterations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Per-iteration alpha start replacing the flow value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpha_start: Vec<f64>,
    /// When set, alpha end is `alpha start + offset` for every iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_end_offset: Option<f64>,
}

impl SweepDef {
    /// Replace `range` with the values it spans.
    pub fn expand_range(&mut self) -> Result<(), ValidationError> {
        let Some(range) = self.range.take() else {
            return Ok(());
        };
        let invalid = |reason: String| ValidationError::InvalidValue {
            field: "sweep.range".to_string(),
            value: format!("{}..{} step {}", range.start, range.stop, range.step),
            reason,
        };
        if !self.values.is_empty() {
            return Err(invalid("give either values or range".to_string()));
        }
        self.values = arange(range.start, range.stop, range.step).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        match self.parameter {
            SweepParameter::Planform => self.planforms.len(),
            _ => self.values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn label(&self, index: usize) -> String {
        if let Some(label) = self.labels.get(index) {
            return label.clone();
        }
        match self.parameter {
            SweepParameter::Planform => self.planforms[index].label.clone(),
            p => format!("{}={}", p.key(), self.values[index]),
        }
    }
}

/// Comparisons and plots to produce from the solver outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisDef {
    /// CL against alpha, lift slope and curve error per reference.
    LiftCurve {
        #[serde(default)]
        references: Vec<String>,
        #[serde(default)]
        sample_on: SampleOn,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        band: Option<ToleranceBand>,
    },
    /// Pitching moment. Against CL it reports the moment slope dCM/dCL;
    /// against alpha it compares like a lift curve and accepts slope lines.
    MomentCurve {
        #[serde(default)]
        references: Vec<String>,
        #[serde(default)]
        against: MomentAxis,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cl_grid: Option<Vec<f64>>,
        #[serde(default)]
        sample_on: SampleOn,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        band: Option<ToleranceBand>,
    },
    /// Spanwise lift, normalized as `loading` selects.
    LoadDistribution {
        #[serde(default)]
        references: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        band: Option<ToleranceBand>,
        #[serde(default)]
        loading: LoadNormalization,
    },
    /// Two-point lift slope, CL and CDi at alpha end, and solver time
    /// against the swept mesh parameter.
    Tessellation {
        #[serde(default)]
        lift_slope: Vec<String>,
        #[serde(default)]
        cl: Vec<String>,
        #[serde(default)]
        cdi: Vec<String>,
        #[serde(default = "default_true")]
        runtime_panel: bool,
    },
}

/// Abscissa of a moment curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentAxis {
    #[default]
    Cl,
    Alpha,
}

/// Ordinate of a load distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadNormalization {
    /// Section lift coefficient `cl`.
    #[default]
    SectionCl,
    /// `cl * c / cref`, with cref from the flow conditions or the mean
    /// geometric chord.
    SpanLoading,
    /// `cl * c / (Cref * CL)`, with Cref from the load file header and CL
    /// from the polar row at the load file's angle of attack.
    LiftNormalized,
}

impl LoadNormalization {
    pub fn metric(self) -> &'static str {
        match self {
            LoadNormalization::SectionCl => "section_cl",
            LoadNormalization::SpanLoading => "span_loading",
            LoadNormalization::LiftNormalized => "lift_normalized_loading",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            LoadNormalization::SectionCl => "Section CL",
            LoadNormalization::SpanLoading => "Cl c / cref",
            LoadNormalization::LiftNormalized => "Cl c / (CL cref)",
        }
    }
}

fn default_true() -> bool {
    true
}

impl AnalysisDef {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisDef::LiftCurve { .. } => "lift_curve",
            AnalysisDef::MomentCurve { .. } => "moment_curve",
            AnalysisDef::LoadDistribution { .. } => "load_distribution",
            AnalysisDef::Tessellation { .. } => "tessellation",
        }
    }

    pub fn reference_ids(&self) -> Vec<&str> {
        match self {
            AnalysisDef::LiftCurve { references, .. }
            | AnalysisDef::MomentCurve { references, .. }
            | AnalysisDef::LoadDistribution { references, .. } => {
                references.iter().map(String::as_str).collect()
            }
            AnalysisDef::Tessellation {
                lift_slope,
                cl,
                cdi,
                ..
            } => lift_slope
                .iter()
                .chain(cl)
                .chain(cdi)
                .map(String::as_str)
                .collect(),
        }
    }

    pub fn needs_load_distribution(&self) -> bool {
        matches!(self, AnalysisDef::LoadDistribution { .. })
    }
}

/// A published dataset or value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDef {
    pub id: String,
    pub label: String,
    /// Iteration label this reference belongs to; applies to all when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<String>,
    /// Sort by x and drop exact duplicate points before use.
    #[serde(default)]
    pub clean: bool,
    /// Shaded band around this reference, in sweep panels and curve
    /// overlays. Overrides the analysis band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<ToleranceBand>,
    pub data: ReferenceData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReferenceData {
    Inline {
        x: Vec<f64>,
        y: Vec<f64>,
    },
    /// Whitespace-separated columns, path relative to the case file.
    File {
        path: PathBuf,
        #[serde(default)]
        skip_rows: usize,
        #[serde(default)]
        x_column: usize,
        #[serde(default = "default_y_column")]
        y_column: usize,
    },
    /// Slope against alpha (dCL/dalpha or dCM/dalpha), expanded to the line
    /// `y = a * alpha` where a curve is needed.
    #[serde(alias = "lift_slope")]
    Slope {
        slope: f64,
        #[serde(default)]
        per_degree: bool,
    },
    Scalar {
        value: f64,
        #[serde(default)]
        per_degree: bool,
    },
}

fn default_y_column() -> usize {
    1
}

impl ReferenceData {
    pub fn is_curve(&self) -> bool {
        matches!(self, ReferenceData::Inline { .. } | ReferenceData::File { .. })
    }
}

/// One fully resolved pass through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    pub index: usize,
    pub label: String,
    pub swept_value: Option<f64>,
    pub wing: WingParameters,
    pub alpha_start: f64,
    pub alpha_end: f64,
    pub alpha_npts: u32,
}

impl CaseDef {
    pub fn is_sweep(&self) -> bool {
        self.sweep.is_some()
    }

    pub fn needs_load_distribution(&self) -> bool {
        self.analyses.iter().any(AnalysisDef::needs_load_distribution)
    }

    pub fn reference(&self, id: &str) -> Option<&ReferenceDef> {
        self.references.iter().find(|r| r.id == id)
    }

    /// Expand the sweep into iterations. Assumes the case validated.
    pub fn iterations(&self) -> Vec<Iteration> {
        let flow = &self.flow;
        let Some(sweep) = &self.sweep else {
            return vec![Iteration {
                index: 0,
                label: BASE_ITERATION.to_string(),
                swept_value: None,
                wing: self.wing,
                alpha_start: flow.alpha_start,
                alpha_end: flow.alpha_end,
                alpha_npts: flow.alpha_npts,
            }];
        };

        (0..sweep.len())
            .map(|i| {
                let value = sweep.values.get(i).copied();
                let wing = match sweep.parameter {
                    SweepParameter::Twist => self.wing.with_twist(sweep.values[i]),
                    SweepParameter::ChordwiseTess => {
                        self.wing.with_chordwise_tess(sweep.values[i].round() as u32)
                    }
                    SweepParameter::SpanwiseTess => {
                        self.wing.with_spanwise_tess(sweep.values[i].round() as u32)
                    }
                    SweepParameter::Planform => self.wing.with_planform(sweep.planforms[i].planform),
                };
                let alpha_start = sweep.alpha_start.get(i).copied().unwrap_or(flow.alpha_start);
                let alpha_end = match sweep.alpha_end_offset {
                    Some(offset) => alpha_start + offset,
                    None => flow.alpha_end,
                };
                Iteration {
                    index: i,
                    label: sweep.label(i),
                    swept_value: value,
                    wing,
                    alpha_start,
                    alpha_end,
                    alpha_npts: flow.alpha_npts,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) const TWIST_CASE: &str = r#"
id: twist
name: Twist sweep
model_file: wing.vsp3
wing:
  planform: {driver: span_chords, span: 7.5, root_chord: 2.38, tip_chord: 0.95}
  sweep_deg: 0
flow:
  alpha_start: -4
  alpha_end: 13
  alpha_npts: 18
  mach: {v_inf: 168.8, speed_of_sound: 1116.45}
  cg: {x: root_quarter_chord, z: 0.025}
sweep:
  parameter: twist
  values: [0, -2]
  labels: [wsh0, wsh2]
  alpha_start: [13.6, 13.4]
  alpha_end_offset: 1.0
analyses:
  - kind: lift_curve
    references: [wsh0]
references:
  - id: wsh0
    label: Experiment
    iteration: wsh0
    data: {source: inline, x: [0, 1], y: [0, 0.1]}
"#;

    #[test]
    fn sweep_expands_into_labelled_iterations() {
        let case: CaseDef = serde_yaml::from_str(TWIST_CASE).unwrap();
        let its = case.iterations();
        assert_eq!(its.len(), 2);
        assert_eq!(its[1].label, "wsh2");
        assert_eq!(its[1].wing.twist_deg, Some(-2.0));
        assert_eq!(its[1].alpha_start, 13.4);
        assert!((its[1].alpha_end - 14.4).abs() < 1e-12);
        assert_eq!(its[0].swept_value, Some(0.0));
        assert_eq!(case.wing.twist_deg, None);
    }

    #[test]
    fn mach_from_velocity_and_cg_anchor() {
        let case: CaseDef = serde_yaml::from_str(TWIST_CASE).unwrap();
        assert!((case.flow.mach.mach() - 0.15119).abs() < 1e-5);
        let (x, y, z) = case.flow.cg.unwrap().resolve(&case.wing);
        assert!((x - 2.38 / 4.0).abs() < 1e-12);
        assert_eq!((y, z), (0.0, 0.025));
    }

    #[test]
    fn case_without_sweep_has_one_base_iteration() {
        let mut case: CaseDef = serde_yaml::from_str(TWIST_CASE).unwrap();
        case.sweep = None;
        let its = case.iterations();
        assert_eq!(its.len(), 1);
        assert_eq!(its[0].label, BASE_ITERATION);
        assert_eq!(its[0].alpha_end, 13.0);
    }

    #[test]
    fn default_labels_name_the_parameter() {
        let sweep = SweepDef {
            parameter: SweepParameter::ChordwiseTess,
            values: vec![5.0, 13.0],
            range: None,
            planforms: Vec::new(),
            labels: Vec::new(),
            alpha_start: Vec::new(),
            alpha_end_offset: None,
        };
        assert_eq!(sweep.label(1), "chordwise_tess=13");
    }

    #[test]
    fn range_expands_into_values_once() {
        let yaml = "parameter: spanwise_tess\nrange: {start: 2, stop: 58, step: 4}\n";
        let mut sweep: SweepDef = serde_yaml::from_str(yaml).unwrap();
        sweep.expand_range().unwrap();
        assert_eq!(sweep.len(), 14);
        assert_eq!(sweep.values[13], 54.0);
        assert!(sweep.range.is_none());

        let yaml = "parameter: twist\nvalues: [0]\nrange: {start: 0, stop: 1, step: 0}\n";
        let mut both: SweepDef = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            both.expand_range(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn moment_and_load_modes_default_to_legacy_plots() {
        let moment: AnalysisDef = serde_yaml::from_str("kind: moment_curve\n").unwrap();
        assert!(matches!(
            moment,
            AnalysisDef::MomentCurve {
                against: MomentAxis::Cl,
                ..
            }
        ));
        let load: AnalysisDef =
            serde_yaml::from_str("kind: load_distribution\nloading: lift_normalized\n").unwrap();
        assert!(matches!(
            load,
            AnalysisDef::LoadDistribution {
                loading: LoadNormalization::LiftNormalized,
                ..
            }
        ));
        let slope: ReferenceData = serde_yaml::from_str("source: lift_slope\nslope: 3.4\n").unwrap();
        assert!(matches!(slope, ReferenceData::Slope { .. }));
    }

    #[test]
    fn tessellation_analysis_collects_all_reference_ids() {
        let yaml = "kind: tessellation\nlift_slope: [a]\ncl: [b]\ncdi: [c]\n";
        let analysis: AnalysisDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(analysis.reference_ids(), vec!["a", "b", "c"]);
        assert!(matches!(
            analysis,
            AnalysisDef::Tessellation {
                runtime_panel: true,
                ..
            }
        ));
    }
}
