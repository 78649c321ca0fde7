//! Run report data types.

use serde::{Deserialize, Serialize};

use crate::PolarResult;

pub type RunId = String;

/// Everything one pipeline execution produced, written as `report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub case_id: String,
    pub case_name: String,
    pub timestamp: String,
    pub solver: String,
    #[serde(default)]
    pub dry_run: bool,
    pub iterations: Vec<IterationRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plots: Vec<String>,
}

impl RunReport {
    pub fn metric(&self, name: &str, iteration: Option<&str>) -> Option<&MetricRecord> {
        self.metrics
            .iter()
            .find(|m| m.name == name && m.iteration.as_deref() == iteration)
    }

    /// Total solver wall time over all iterations.
    pub fn solver_seconds(&self) -> f64 {
        self.iterations
            .iter()
            .filter_map(|it| it.solver.as_ref())
            .map(|s| s.elapsed_s)
            .sum()
    }
}

/// One pass through geometry, template, solver and parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swept_value: Option<f64>,
    pub model_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polar: Option<PolarResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverRecord {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub elapsed_s: f64,
}

/// A derived quantity, optionally compared with a reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub analysis: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<String>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_label: Option<String>,
    /// Non-finite values serialize as `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_percent: Option<f64>,
}
