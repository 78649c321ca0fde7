//! Polar output: coefficients against angle of attack.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ResultsResult;
use crate::table::{ColumnSpec, TableSpec, read_columns, read_columns_from_file};

/// Column layout of the polar file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarColumns {
    pub skip_rows: usize,
    pub alpha: ColumnSpec,
    pub cl: ColumnSpec,
    pub cdi: ColumnSpec,
    pub cm: ColumnSpec,
}

impl Default for PolarColumns {
    fn default() -> Self {
        Self {
            skip_rows: 1,
            alpha: ColumnSpec::at(2),
            cl: ColumnSpec::at(4),
            cdi: ColumnSpec::at(6),
            cm: ColumnSpec::at(18),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarResult {
    pub alpha: Vec<f64>,
    pub cl: Vec<f64>,
    pub cdi: Vec<f64>,
    pub cm: Vec<f64>,
}

impl PolarResult {
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    /// CL of the row whose alpha is nearest `alpha`.
    pub fn cl_nearest(&self, alpha: f64) -> Option<f64> {
        self.alpha
            .iter()
            .zip(&self.cl)
            .min_by(|a, b| (a.0 - alpha).abs().total_cmp(&(b.0 - alpha).abs()))
            .map(|(_, cl)| *cl)
    }
}

impl PolarColumns {
    fn specs(&self) -> [ColumnSpec; 4] {
        [
            self.alpha.clone(),
            self.cl.clone(),
            self.cdi.clone(),
            self.cm.clone(),
        ]
    }
}

pub fn parse_polar(text: &str, layout: &PolarColumns) -> ResultsResult<PolarResult> {
    let mut cols = read_columns(text, TableSpec::skip(layout.skip_rows), &layout.specs())?;
    Ok(into_polar(&mut cols))
}

pub fn read_polar(path: &Path, layout: &PolarColumns) -> ResultsResult<PolarResult> {
    let mut cols = read_columns_from_file(path, TableSpec::skip(layout.skip_rows), &layout.specs())?;
    let polar = into_polar(&mut cols);
    debug!(path = %path.display(), rows = polar.len(), "parsed polar");
    Ok(polar)
}

fn into_polar(cols: &mut [Vec<f64>]) -> PolarResult {
    PolarResult {
        alpha: std::mem::take(&mut cols[0]),
        cl: std::mem::take(&mut cols[1]),
        cdi: std::mem::take(&mut cols[2]),
        cm: std::mem::take(&mut cols[3]),
    }
}
