//! Spanwise load distribution output.
//!
//! The file opens with a banner, then a block of reference quantities (one
//! `name value [unit]` row each), then the per-station table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{ColumnSpec, TableSpec, read_columns};
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadColumns {
    pub skip_rows: usize,
    pub span_station: ColumnSpec,
    pub chord: ColumnSpec,
    pub cl: ColumnSpec,
    /// First line of the reference block.
    pub reference_skip: usize,
    pub reference_rows: usize,
}

impl Default for LoadColumns {
    fn default() -> Self {
        Self {
            skip_rows: 19,
            span_station: ColumnSpec::at(1),
            chord: ColumnSpec::at(5),
            cl: ColumnSpec::at(7),
            reference_skip: 3,
            reference_rows: 14,
        }
    }
}

/// Name/value pairs from the file header, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGeometry {
    pub entries: Vec<(String, f64)>,
}

impl ReferenceGeometry {
    /// Look up a value by name, ignoring the trailing underscores used as
    /// padding in the file (`Sref_` matches `Sref`).
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n.trim_end_matches('_') == name)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadDistributionResult {
    pub span_station: Vec<f64>,
    pub cl: Vec<f64>,
    pub chord: Vec<f64>,
    pub reference: ReferenceGeometry,
}

impl LoadDistributionResult {
    /// Local lift coefficient scaled by chord over reference chord.
    pub fn cl_c_over_cref(&self, cref: f64) -> Vec<f64> {
        self.cl
            .iter()
            .zip(&self.chord)
            .map(|(cl, c)| cl * c / cref)
            .collect()
    }

    /// Span loading normalized by total lift, `cl * c / (Cref * CL)`, with
    /// `Cref` taken from the reference block.
    pub fn lift_normalized(&self, total_cl: f64) -> ResultsResult<Vec<f64>> {
        let cref = self
            .reference
            .get("Cref")
            .ok_or_else(|| ResultsError::MissingReference {
                name: "Cref".to_string(),
            })?;
        Ok(self.cl_c_over_cref(cref * total_cl))
    }
}

/// Parse a load-distribution file. `spanwise_tess` caps the table at
/// `spanwise_tess - 1` stations, the number of spanwise strips.
pub fn parse_load_distribution(
    text: &str,
    layout: &LoadColumns,
    spanwise_tess: Option<u32>,
) -> ResultsResult<LoadDistributionResult> {
    let mut spec = TableSpec::skip(layout.skip_rows);
    if let Some(n) = spanwise_tess {
        spec = spec.with_max_rows(n.saturating_sub(1) as usize);
    }
    let columns = [
        layout.span_station.clone(),
        layout.chord.clone(),
        layout.cl.clone(),
    ];
    let mut cols = read_columns(text, spec, &columns)?;
    Ok(LoadDistributionResult {
        span_station: std::mem::take(&mut cols[0]),
        chord: std::mem::take(&mut cols[1]),
        cl: std::mem::take(&mut cols[2]),
        reference: parse_reference_block(text, layout)?,
    })
}

pub fn read_load_distribution(
    path: &Path,
    layout: &LoadColumns,
    spanwise_tess: Option<u32>,
) -> ResultsResult<LoadDistributionResult> {
    let text = std::fs::read_to_string(path).map_err(|source| ResultsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let result = parse_load_distribution(&text, layout, spanwise_tess)?;
    debug!(
        path = %path.display(),
        stations = result.span_station.len(),
        references = result.reference.entries.len(),
        "parsed load distribution"
    );
    Ok(result)
}

fn parse_reference_block(text: &str, layout: &LoadColumns) -> ResultsResult<ReferenceGeometry> {
    let rows: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .skip(layout.reference_skip)
        .take(layout.reference_rows)
        .collect();
    if rows.len() < layout.reference_rows {
        return Err(ResultsError::Truncated {
            needed: layout.reference_skip + layout.reference_rows,
            got: layout.reference_skip + rows.len(),
        });
    }

    let mut entries = Vec::with_capacity(rows.len());
    for (i, line) in rows {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let Some(token) = tokens.next() else {
            return Err(ResultsError::MissingColumn {
                line: i + 1,
                column: 1,
                width: usize::from(!name.is_empty()),
            });
        };
        let value = token.parse::<f64>().map_err(|_| ResultsError::Parse {
            line: i + 1,
            column: 1,
            token: token.to_string(),
        })?;
        entries.push((name.to_string(), value));
    }
    Ok(ReferenceGeometry { entries })
}
