//! Published experimental or empirical data.

use serde::{Deserialize, Serialize};

/// Labelled (x, y) reference data. Never mutated in place; cleanup returns a
/// new series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSeries {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ReferenceSeries {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    /// The line `y = a * alpha` for a slope `a` per radian (dCL/dalpha or
    /// dCM/dalpha), sampled at `alpha_deg`.
    pub fn from_slope(label: impl Into<String>, slope_per_rad: f64, alpha_deg: &[f64]) -> Self {
        Self::new(
            label,
            alpha_deg.to_vec(),
            alpha_deg.iter().map(|a| slope_per_rad * a.to_radians()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Points sorted by x with exact duplicates removed.
    pub fn cleaned(&self) -> Self {
        let mut points: Vec<(f64, f64)> = self.x.iter().copied().zip(self.y.iter().copied()).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        points.dedup();
        let (x, y) = points.into_iter().unzip();
        Self {
            label: self.label.clone(),
            x,
            y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaned_sorts_and_drops_exact_duplicates() {
        let raw = ReferenceSeries::new(
            "NACA TN-1270",
            vec![4.0, 0.0, 2.0, 2.0, 2.0],
            vec![0.3, 0.0, 0.15, 0.15, 0.16],
        );
        let clean = raw.cleaned();
        assert_eq!(clean.x, vec![0.0, 2.0, 2.0, 4.0]);
        assert_eq!(clean.y, vec![0.0, 0.15, 0.16, 0.3]);
        assert_eq!(raw.x[0], 4.0);
    }

    #[test]
    fn slope_line_passes_through_origin() {
        let line = ReferenceSeries::from_slope("DATCOM", 3.5, &[0.0, 10.0]);
        assert_eq!(line.y[0], 0.0);
        assert!((line.y[1] - 3.5 * 10f64.to_radians()).abs() < 1e-12);
    }
}
