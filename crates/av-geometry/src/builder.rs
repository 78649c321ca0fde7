//! Wing construction as a sequence of modeling API calls.

use tracing::debug;

use crate::api::{GeomId, GeomKind, ModelApi, WingDriver, XSecShape};
use crate::wing::{Airfoil, MeshParameters, Planform, WingParameters};
use crate::GeometryResult;

const OUTBOARD: &str = "XSec_1";
const WING_GROUP: &str = "WingGeom";
const SHAPE_GROUP: &str = "Shape";
const CURVES: [&str; 2] = ["XSecCurve_0", "XSecCurve_1"];

/// Builds a single-panel wing and saves it under `model_file`.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    model_file: String,
}

impl GeometryBuilder {
    pub fn new(model_file: impl Into<String>) -> Self {
        Self {
            model_file: model_file.into(),
        }
    }

    pub fn model_file(&self) -> &str {
        &self.model_file
    }

    /// Issue every call needed to turn `params` into a saved model.
    pub fn build<A: ModelApi + ?Sized>(
        &self,
        api: &mut A,
        params: &WingParameters,
    ) -> GeometryResult<GeomId> {
        params.validate()?;

        api.clear_model()?;
        let wing = api.add_geom(GeomKind::Wing)?;

        set_planform(api, &wing, &params.planform)?;

        if let Some(loc) = params.sweep_location {
            api.set_parm(&wing, "Sweep_Location", OUTBOARD, loc.into())?;
        }
        api.set_parm(&wing, "Sweep", OUTBOARD, params.sweep_deg.into())?;
        if let Some(dihedral) = params.dihedral_deg {
            api.set_parm(&wing, "Dihedral", OUTBOARD, dihedral.into())?;
        }
        if let Some(twist) = params.twist_deg {
            api.set_parm(&wing, "Twist", OUTBOARD, twist.into())?;
        }
        if let Some(flag) = params.rotate_to_match_dihedral {
            // Parameter name is spelled this way by the modeling tool.
            api.set_parm(&wing, "RotateMatchDideralFlag", OUTBOARD, flag.into())?;
        }

        if let Some(airfoil) = params.airfoil {
            set_airfoil(api, &wing, &airfoil)?;
        }

        set_mesh(api, &wing, &params.mesh)?;
        api.update()?;

        api.write_model(&self.model_file)?;
        api.update()?;

        debug!(model = %self.model_file, geom = %wing, "wing model built");
        Ok(wing)
    }
}

fn set_planform<A: ModelApi + ?Sized>(
    api: &mut A,
    wing: &GeomId,
    planform: &Planform,
) -> GeometryResult<()> {
    match *planform {
        Planform::SpanChords {
            span,
            root_chord,
            tip_chord,
        } => {
            api.set_parm(wing, "Span", OUTBOARD, span.into())?;
            api.set_parm(wing, "Root_Chord", OUTBOARD, root_chord.into())?;
            api.set_parm(wing, "Tip_Chord", OUTBOARD, tip_chord.into())?;
        }
        Planform::TotalSpan {
            total_span,
            root_chord,
            tip_chord,
        } => {
            api.set_parm(wing, "TotalSpan", WING_GROUP, total_span.into())?;
            api.set_parm(wing, "Root_Chord", OUTBOARD, root_chord.into())?;
            api.set_parm(wing, "Tip_Chord", OUTBOARD, tip_chord.into())?;
        }
        Planform::AspectTaperSpan {
            aspect_ratio,
            taper,
            total_span,
        } => {
            api.set_driver_group(
                wing,
                1,
                [WingDriver::AspectRatio, WingDriver::Taper, WingDriver::Span],
            )?;
            // Section values describe one half of the wing.
            api.set_parm(wing, "Aspect", OUTBOARD, (aspect_ratio / 2.0).into())?;
            api.set_parm(wing, "Span", OUTBOARD, (total_span / 2.0).into())?;
            api.set_parm(wing, "Taper", OUTBOARD, taper.into())?;
        }
    }
    Ok(())
}

fn set_airfoil<A: ModelApi + ?Sized>(
    api: &mut A,
    wing: &GeomId,
    airfoil: &Airfoil,
) -> GeometryResult<()> {
    match *airfoil {
        Airfoil::FourSeries { thickness_chord } => {
            for curve in CURVES {
                api.set_parm(wing, "ThickChord", curve, thickness_chord.into())?;
            }
        }
        Airfoil::SixSeries {
            series,
            thickness_chord,
            ideal_cl,
        } => {
            api.change_xsec_shape(wing, 0, 0, XSecShape::SixSeries)?;
            api.change_xsec_shape(wing, 0, 1, XSecShape::SixSeries)?;
            api.update()?;
            for curve in CURVES {
                api.set_parm(wing, "Series", curve, series.into())?;
            }
            for curve in CURVES {
                api.set_parm(wing, "ThickChord", curve, thickness_chord.into())?;
            }
            if let Some(cl) = ideal_cl {
                for curve in CURVES {
                    api.set_parm(wing, "IdealCl", curve, cl.into())?;
                }
            }
        }
    }
    Ok(())
}

fn set_mesh<A: ModelApi + ?Sized>(
    api: &mut A,
    wing: &GeomId,
    mesh: &MeshParameters,
) -> GeometryResult<()> {
    if let Some(n) = mesh.chordwise_tess {
        api.set_parm(wing, "Tess_W", SHAPE_GROUP, n.into())?;
    }
    if let Some(n) = mesh.spanwise_tess {
        api.set_parm(wing, "SectTess_U", OUTBOARD, n.into())?;
    }
    api.set_parm(wing, "InCluster", OUTBOARD, mesh.root_cluster.into())?;
    api.set_parm(wing, "OutCluster", OUTBOARD, mesh.tip_cluster.into())?;
    if let Some(le) = mesh.le_cluster {
        api.set_parm(wing, "LECluster", WING_GROUP, le.into())?;
    }
    if let Some(te) = mesh.te_cluster {
        api.set_parm(wing, "TECluster", WING_GROUP, te.into())?;
    }
    Ok(())
}
