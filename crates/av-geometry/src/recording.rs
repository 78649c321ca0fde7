//! In-memory modeling API that only records what it was asked to do.
//!
//! Used for dry runs and to assert on geometry construction in tests.

use crate::api::{AnalysisInput, GeomId, GeomKind, ModelApi, ParmValue, ResultId, WingDriver, XSecShape};
use crate::{GeometryError, GeometryResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ClearModel,
    AddGeom {
        kind: GeomKind,
        id: GeomId,
    },
    SetDriverGroup {
        geom: GeomId,
        section: u32,
        drivers: [WingDriver; 3],
    },
    SetParm {
        geom: GeomId,
        name: String,
        group: String,
        value: ParmValue,
    },
    ChangeXSecShape {
        geom: GeomId,
        surf_index: u32,
        xsec_index: u32,
        shape: XSecShape,
    },
    Update,
    WriteModel(String),
    ReadModel(String),
    SetAnalysisDefaults(String),
    SetAnalysisInput {
        analysis: String,
        name: String,
        value: AnalysisInput,
    },
    ExecAnalysis(String),
}

#[derive(Debug, Default)]
pub struct RecordingModelApi {
    calls: Vec<ApiCall>,
    geoms: Vec<GeomId>,
    results: usize,
}

impl RecordingModelApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[ApiCall] {
        &self.calls
    }

    /// Last value set for `name` in `group`, as the tool would store it.
    pub fn parm(&self, name: &str, group: &str) -> Option<f64> {
        self.calls.iter().rev().find_map(|call| match call {
            ApiCall::SetParm {
                name: n,
                group: g,
                value,
                ..
            } if n == name && g == group => Some(value.as_f64()),
            _ => None,
        })
    }

    pub fn written_models(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::WriteModel(f) => Some(f.as_str()),
                _ => None,
            })
            .collect()
    }

    fn check_geom(&self, geom: &GeomId) -> GeometryResult<()> {
        if self.geoms.contains(geom) {
            Ok(())
        } else {
            Err(GeometryError::UnknownGeom(geom.0.clone()))
        }
    }
}

impl ModelApi for RecordingModelApi {
    fn clear_model(&mut self) -> GeometryResult<()> {
        self.geoms.clear();
        self.calls.push(ApiCall::ClearModel);
        Ok(())
    }

    fn add_geom(&mut self, kind: GeomKind) -> GeometryResult<GeomId> {
        let id = GeomId(format!("geom_{}", self.geoms.len()));
        self.geoms.push(id.clone());
        self.calls.push(ApiCall::AddGeom {
            kind,
            id: id.clone(),
        });
        Ok(id)
    }

    fn set_driver_group(
        &mut self,
        geom: &GeomId,
        section: u32,
        drivers: [WingDriver; 3],
    ) -> GeometryResult<()> {
        self.check_geom(geom)?;
        self.calls.push(ApiCall::SetDriverGroup {
            geom: geom.clone(),
            section,
            drivers,
        });
        Ok(())
    }

    fn set_parm(
        &mut self,
        geom: &GeomId,
        name: &str,
        group: &str,
        value: ParmValue,
    ) -> GeometryResult<()> {
        self.check_geom(geom)?;
        self.calls.push(ApiCall::SetParm {
            geom: geom.clone(),
            name: name.to_string(),
            group: group.to_string(),
            value,
        });
        Ok(())
    }

    fn change_xsec_shape(
        &mut self,
        geom: &GeomId,
        surf_index: u32,
        xsec_index: u32,
        shape: XSecShape,
    ) -> GeometryResult<()> {
        self.check_geom(geom)?;
        self.calls.push(ApiCall::ChangeXSecShape {
            geom: geom.clone(),
            surf_index,
            xsec_index,
            shape,
        });
        Ok(())
    }

    fn update(&mut self) -> GeometryResult<()> {
        self.calls.push(ApiCall::Update);
        Ok(())
    }

    fn write_model(&mut self, file_name: &str) -> GeometryResult<()> {
        self.calls.push(ApiCall::WriteModel(file_name.to_string()));
        Ok(())
    }

    fn read_model(&mut self, file_name: &str) -> GeometryResult<()> {
        self.calls.push(ApiCall::ReadModel(file_name.to_string()));
        Ok(())
    }

    fn set_analysis_defaults(&mut self, analysis: &str) -> GeometryResult<()> {
        self.calls
            .push(ApiCall::SetAnalysisDefaults(analysis.to_string()));
        Ok(())
    }

    fn set_analysis_input(
        &mut self,
        analysis: &str,
        name: &str,
        value: AnalysisInput,
    ) -> GeometryResult<()> {
        self.calls.push(ApiCall::SetAnalysisInput {
            analysis: analysis.to_string(),
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn exec_analysis(&mut self, analysis: &str) -> GeometryResult<ResultId> {
        self.calls.push(ApiCall::ExecAnalysis(analysis.to_string()));
        let id = ResultId(format!("result_{}", self.results));
        self.results += 1;
        Ok(id)
    }
}
