//! Modeling API capability surface.

use std::fmt;

use crate::GeometryResult;

/// Handle to a component created by [`ModelApi::add_geom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeomId(pub String);

impl fmt::Display for GeomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a result set returned by [`ModelApi::exec_analysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomKind {
    Wing,
    Pod,
}

impl GeomKind {
    pub fn type_name(self) -> &'static str {
        match self {
            GeomKind::Wing => "WING",
            GeomKind::Pod => "POD",
        }
    }
}

/// Planform drivers accepted by a wing section driver group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WingDriver {
    AspectRatio,
    Taper,
    Span,
    Area,
    RootChord,
    TipChord,
}

impl WingDriver {
    pub fn constant_name(self) -> &'static str {
        match self {
            WingDriver::AspectRatio => "AR_WSECT_DRIVER",
            WingDriver::Taper => "TAPER_WSECT_DRIVER",
            WingDriver::Span => "SPAN_WSECT_DRIVER",
            WingDriver::Area => "AREA_WSECT_DRIVER",
            WingDriver::RootChord => "ROOTC_WSECT_DRIVER",
            WingDriver::TipChord => "TIPC_WSECT_DRIVER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XSecShape {
    FourSeries,
    SixSeries,
}

impl XSecShape {
    pub fn constant_name(self) -> &'static str {
        match self {
            XSecShape::FourSeries => "XS_FOUR_SERIES",
            XSecShape::SixSeries => "XS_SIX_SERIES",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParmValue {
    Real(f64),
    Int(i64),
    Flag(bool),
}

impl ParmValue {
    /// Parameters are stored as doubles by the modeling tool.
    pub fn as_f64(self) -> f64 {
        match self {
            ParmValue::Real(v) => v,
            ParmValue::Int(v) => v as f64,
            ParmValue::Flag(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl From<f64> for ParmValue {
    fn from(v: f64) -> Self {
        ParmValue::Real(v)
    }
}

impl From<u32> for ParmValue {
    fn from(v: u32) -> Self {
        ParmValue::Int(v as i64)
    }
}

impl From<bool> for ParmValue {
    fn from(v: bool) -> Self {
        ParmValue::Flag(v)
    }
}

/// Typed analysis input vector.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Int(Vec<i64>),
    /// Integer input given by a named tool constant (e.g. `VORTEX_LATTICE`).
    IntConstant(String),
    Double(Vec<f64>),
    Str(Vec<String>),
}

/// Geometry construction and analysis calls consumed from the modeling tool.
pub trait ModelApi {
    fn clear_model(&mut self) -> GeometryResult<()>;

    fn add_geom(&mut self, kind: GeomKind) -> GeometryResult<GeomId>;

    fn set_driver_group(
        &mut self,
        geom: &GeomId,
        section: u32,
        drivers: [WingDriver; 3],
    ) -> GeometryResult<()>;

    /// Set a named parameter in a parameter group and update the model.
    fn set_parm(
        &mut self,
        geom: &GeomId,
        name: &str,
        group: &str,
        value: ParmValue,
    ) -> GeometryResult<()>;

    fn change_xsec_shape(
        &mut self,
        geom: &GeomId,
        surf_index: u32,
        xsec_index: u32,
        shape: XSecShape,
    ) -> GeometryResult<()>;

    fn update(&mut self) -> GeometryResult<()>;

    fn write_model(&mut self, file_name: &str) -> GeometryResult<()>;

    fn read_model(&mut self, file_name: &str) -> GeometryResult<()>;

    fn set_analysis_defaults(&mut self, analysis: &str) -> GeometryResult<()>;

    fn set_analysis_input(
        &mut self,
        analysis: &str,
        name: &str,
        value: AnalysisInput,
    ) -> GeometryResult<()>;

    fn exec_analysis(&mut self, analysis: &str) -> GeometryResult<ResultId>;
}
