//! Wing parameter records.
//!
//! Lengths are in whatever unit the case is written in (the wind-tunnel
//! cases use feet). Angles are in degrees, matching the modeling API.

use av_core::units::{atan_deg, tan_deg};
use serde::{Deserialize, Serialize};

use crate::{GeometryError, GeometryResult};

/// How the outboard section's planform is driven.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "driver", rename_all = "snake_case")]
pub enum Planform {
    /// Semi-span and root/tip chords of the outboard section.
    SpanChords {
        span: f64,
        root_chord: f64,
        tip_chord: f64,
    },
    /// Tip-to-tip span on the wing, chords on the section.
    TotalSpan {
        total_span: f64,
        root_chord: f64,
        tip_chord: f64,
    },
    /// Aspect ratio / taper / span driver group. Both `aspect_ratio` and
    /// `total_span` describe the full wing.
    AspectTaperSpan {
        aspect_ratio: f64,
        taper: f64,
        total_span: f64,
    },
}

impl Planform {
    pub fn semi_span(&self) -> f64 {
        match *self {
            Planform::SpanChords { span, .. } => span,
            Planform::TotalSpan { total_span, .. } => total_span / 2.0,
            Planform::AspectTaperSpan { total_span, .. } => total_span / 2.0,
        }
    }

    pub fn root_chord(&self) -> f64 {
        match *self {
            Planform::SpanChords { root_chord, .. } | Planform::TotalSpan { root_chord, .. } => {
                root_chord
            }
            Planform::AspectTaperSpan {
                aspect_ratio,
                taper,
                total_span,
            } => {
                let mean_chord = total_span / aspect_ratio;
                2.0 * mean_chord / (1.0 + taper)
            }
        }
    }

    pub fn tip_chord(&self) -> f64 {
        match *self {
            Planform::SpanChords { tip_chord, .. } | Planform::TotalSpan { tip_chord, .. } => {
                tip_chord
            }
            Planform::AspectTaperSpan { taper, .. } => self.root_chord() * taper,
        }
    }

    pub fn taper_ratio(&self) -> f64 {
        match *self {
            Planform::AspectTaperSpan { taper, .. } => taper,
            _ => self.tip_chord() / self.root_chord(),
        }
    }
}

/// Section family applied to both cross sections of the wing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Airfoil {
    /// Default four-digit section with only thickness overridden.
    FourSeries { thickness_chord: f64 },
    /// NACA 6-series section.
    SixSeries {
        series: u32,
        thickness_chord: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ideal_cl: Option<f64>,
    },
}

impl Airfoil {
    pub fn thickness_chord(&self) -> f64 {
        match *self {
            Airfoil::FourSeries { thickness_chord } => thickness_chord,
            Airfoil::SixSeries {
                thickness_chord, ..
            } => thickness_chord,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MeshParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chordwise_tess: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spanwise_tess: Option<u32>,
    #[serde(default = "default_root_cluster")]
    pub root_cluster: f64,
    #[serde(default = "default_tip_cluster")]
    pub tip_cluster: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub le_cluster: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub te_cluster: Option<f64>,
}

fn default_root_cluster() -> f64 {
    1.0
}

fn default_tip_cluster() -> f64 {
    0.5
}

impl Default for MeshParameters {
    fn default() -> Self {
        Self {
            chordwise_tess: Some(33),
            spanwise_tess: Some(24),
            root_cluster: default_root_cluster(),
            tip_cluster: default_tip_cluster(),
            le_cluster: Some(0.25),
            te_cluster: Some(0.25),
        }
    }
}

/// Immutable description of one wing configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WingParameters {
    pub planform: Planform,
    #[serde(default)]
    pub sweep_deg: f64,
    /// Chord fraction the sweep angle is measured at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_location: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dihedral_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twist_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_to_match_dihedral: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airfoil: Option<Airfoil>,
    #[serde(default)]
    pub mesh: MeshParameters,
}

impl WingParameters {
    pub fn validate(&self) -> GeometryResult<()> {
        positive("semi_span", self.planform.semi_span())?;
        positive("root_chord", self.planform.root_chord())?;
        positive("tip_chord", self.planform.tip_chord())?;
        if let Planform::AspectTaperSpan { aspect_ratio, .. } = self.planform {
            positive("aspect_ratio", aspect_ratio)?;
        }
        if let Some(loc) = self.sweep_location
            && !(0.0..=1.0).contains(&loc)
        {
            return Err(GeometryError::InvalidParameter {
                field: "sweep_location",
                value: loc,
                reason: "must be a chord fraction in [0, 1]",
            });
        }
        if self.sweep_deg.abs() >= 90.0 {
            return Err(GeometryError::InvalidParameter {
                field: "sweep_deg",
                value: self.sweep_deg,
                reason: "must be within (-90, 90) degrees",
            });
        }
        if let Some(airfoil) = self.airfoil {
            positive("thickness_chord", airfoil.thickness_chord())?;
        }
        for (field, tess) in [
            ("chordwise_tess", self.mesh.chordwise_tess),
            ("spanwise_tess", self.mesh.spanwise_tess),
        ] {
            if let Some(n) = tess
                && n < 2
            {
                return Err(GeometryError::InvalidParameter {
                    field,
                    value: n as f64,
                    reason: "tessellation needs at least 2 points",
                });
            }
        }
        Ok(())
    }

    pub fn taper_ratio(&self) -> f64 {
        self.planform.taper_ratio()
    }

    /// Mean geometric chord of a straight-tapered panel.
    pub fn mean_geometric_chord(&self) -> f64 {
        let cr = self.planform.root_chord();
        let lambda = self.taper_ratio();
        2.0 / 3.0 * cr * (1.0 + lambda + lambda * lambda) / (1.0 + lambda)
    }

    /// Spanwise station of the mean geometric chord.
    pub fn mgc_span_station(&self) -> f64 {
        let lambda = self.taper_ratio();
        self.planform.semi_span() / 3.0 * (1.0 + 2.0 * lambda) / (1.0 + lambda)
    }

    /// Leading-edge sweep derived from the sweep at `sweep_location`.
    pub fn leading_edge_sweep_deg(&self) -> f64 {
        let loc = self.sweep_location.unwrap_or(0.0);
        let cr = self.planform.root_chord();
        let ct = self.planform.tip_chord();
        let tan_le = tan_deg(self.sweep_deg) + loc * (cr - ct) / self.planform.semi_span();
        atan_deg(tan_le)
    }

    /// Longitudinal station of the quarter chord of the mean geometric chord.
    pub fn mgc_quarter_chord_x(&self) -> f64 {
        self.mgc_span_station() * tan_deg(self.leading_edge_sweep_deg())
            + self.mean_geometric_chord() / 4.0
    }

    pub fn with_twist(mut self, twist_deg: f64) -> Self {
        self.twist_deg = Some(twist_deg);
        self
    }

    pub fn with_chordwise_tess(mut self, n: u32) -> Self {
        self.mesh.chordwise_tess = Some(n);
        self
    }

    pub fn with_spanwise_tess(mut self, n: u32) -> Self {
        self.mesh.spanwise_tess = Some(n);
        self
    }

    pub fn with_planform(mut self, planform: Planform) -> Self {
        self.planform = planform;
        self
    }
}

fn positive(field: &'static str, value: f64) -> GeometryResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidParameter {
            field,
            value,
            reason: "must be positive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tapered_wing(sweep_deg: f64) -> WingParameters {
        WingParameters {
            planform: Planform::SpanChords {
                span: 63.630 / 12.0,
                root_chord: 21.941 / 12.0,
                tip_chord: 9.873 / 12.0,
            },
            sweep_deg,
            sweep_location: Some(0.25),
            dihedral_deg: None,
            twist_deg: None,
            rotate_to_match_dihedral: None,
            airfoil: None,
            mesh: MeshParameters::default(),
        }
    }

    #[test]
    fn mean_geometric_chord_of_rectangle_is_chord() {
        let wing = WingParameters {
            planform: Planform::TotalSpan {
                total_span: 10.0,
                root_chord: 1.0,
                tip_chord: 1.0,
            },
            ..tapered_wing(0.0)
        };
        assert!((wing.mean_geometric_chord() - 1.0).abs() < 1e-12);
        assert!((wing.mgc_span_station() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn leading_edge_sweep_from_quarter_chord() {
        let wing = tapered_wing(45.0);
        assert!((wing.leading_edge_sweep_deg() - 46.33).abs() < 0.02);
    }

    #[test]
    fn unswept_quarter_chord_puts_mgc_at_root_quarter_chord() {
        let wing = WingParameters {
            planform: Planform::SpanChords {
                span: 180.0 / 2.0 / 12.0,
                root_chord: 28.57 / 12.0,
                tip_chord: 11.43 / 12.0,
            },
            ..tapered_wing(0.0)
        };
        let expected = wing.planform.root_chord() / 4.0;
        assert!((wing.mgc_quarter_chord_x() - expected).abs() < 1e-9);
    }

    #[test]
    fn aspect_driver_recovers_chords() {
        let planform = Planform::AspectTaperSpan {
            aspect_ratio: 4.0,
            taper: 0.5,
            total_span: 13.5 / 12.0,
        };
        let cr = planform.root_chord();
        let ct = planform.tip_chord();
        let area = (cr + ct) / 2.0 * 13.5 / 12.0;
        assert!(((13.5f64 / 12.0).powi(2) / area - 4.0).abs() < 1e-12);
        assert!((ct / cr - 0.5).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut wing = tapered_wing(0.0);
        wing.sweep_location = Some(1.5);
        assert!(wing.validate().is_err());

        let wing = tapered_wing(0.0).with_chordwise_tess(1);
        assert!(wing.validate().is_err());

        let wing = tapered_wing(0.0).with_planform(Planform::SpanChords {
            span: -1.0,
            root_chord: 1.0,
            tip_chord: 1.0,
        });
        assert!(wing.validate().is_err());
    }

    #[test]
    fn with_helpers_do_not_touch_other_fields() {
        let base = tapered_wing(45.0);
        let swept = base.with_twist(-2.0).with_spanwise_tess(12);
        assert_eq!(swept.twist_deg, Some(-2.0));
        assert_eq!(swept.mesh.spanwise_tess, Some(12));
        assert_eq!(swept.planform, base.planform);
        assert_eq!(base.twist_deg, None);
    }
}
