//! Turning reference definitions into data the comparator can use.

use std::path::Path;

use av_compare::{ReferenceSeries, ToleranceBand};
use av_core::per_degree_to_per_radian;
use av_results::{ColumnSpec, TableSpec, read_columns_from_file};
use tracing::debug;

use crate::case::{CaseDef, ReferenceData, ReferenceDef};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    Curve(ReferenceSeries),
    /// Slope against alpha, per radian.
    Slope(f64),
    Scalar(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub id: String,
    pub label: String,
    pub iteration: Option<String>,
    pub band: Option<ToleranceBand>,
    pub value: ReferenceValue,
}

impl ResolvedReference {
    /// True when the reference is meant for the iteration labelled `label`.
    pub fn applies_to(&self, label: &str) -> bool {
        self.iteration.as_deref().is_none_or(|l| l == label)
    }

    /// Scalar value for sweep panels. Slopes are per radian.
    pub fn scalar(&self) -> Option<f64> {
        match self.value {
            ReferenceValue::Slope(v) | ReferenceValue::Scalar(v) => Some(v),
            ReferenceValue::Curve(_) => None,
        }
    }
}

/// All references of a case, resolved once per run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    items: Vec<ResolvedReference>,
}

impl ReferenceSet {
    /// Resolve every reference; file paths are relative to `base_dir`.
    pub fn resolve(case: &CaseDef, base_dir: &Path) -> AppResult<Self> {
        let items = case
            .references
            .iter()
            .map(|r| resolve_reference(r, base_dir))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { items })
    }

    pub fn get(&self, id: &str) -> AppResult<&ResolvedReference> {
        self.items
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::UnknownReference { id: id.to_string() })
    }

    /// The references named by `ids` that apply to iteration `label`.
    pub fn for_iteration<'a>(
        &'a self,
        ids: &'a [String],
        label: &'a str,
    ) -> impl Iterator<Item = AppResult<&'a ResolvedReference>> + 'a {
        ids.iter()
            .map(|id| self.get(id))
            .filter(move |r| match r {
                Ok(r) => r.applies_to(label),
                Err(_) => true,
            })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn resolve_reference(def: &ReferenceDef, base_dir: &Path) -> AppResult<ResolvedReference> {
    let value = match &def.data {
        ReferenceData::Inline { x, y } => {
            ReferenceValue::Curve(ReferenceSeries::new(&def.label, x.clone(), y.clone()))
        }
        ReferenceData::File {
            path,
            skip_rows,
            x_column,
            y_column,
        } => {
            let full = base_dir.join(path);
            let mut cols = read_columns_from_file(
                &full,
                TableSpec::skip(*skip_rows),
                &[ColumnSpec::at(*x_column), ColumnSpec::at(*y_column)],
            )?;
            let y = std::mem::take(&mut cols[1]);
            let x = std::mem::take(&mut cols[0]);
            debug!(id = %def.id, path = %full.display(), points = x.len(), "loaded reference file");
            ReferenceValue::Curve(ReferenceSeries::new(&def.label, x, y))
        }
        ReferenceData::Slope { slope, per_degree } => {
            ReferenceValue::Slope(to_per_radian(*slope, *per_degree))
        }
        ReferenceData::Scalar { value, per_degree } => {
            ReferenceValue::Scalar(to_per_radian(*value, *per_degree))
        }
    };

    let value = match value {
        ReferenceValue::Curve(series) if def.clean => ReferenceValue::Curve(series.cleaned()),
        other => other,
    };

    Ok(ResolvedReference {
        id: def.id.clone(),
        label: def.label.clone(),
        iteration: def.iteration.clone(),
        band: def.band,
        value,
    })
}

fn to_per_radian(value: f64, per_degree: bool) -> f64 {
    if per_degree {
        per_degree_to_per_radian(value)
    } else {
        value
    }
}
