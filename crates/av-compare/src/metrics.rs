//! Derived coefficients and error metrics.

use av_core::{AvError, diff, linspace, mean, per_degree_to_per_radian};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CompareResult;
use crate::interp::Interp1d;

/// Which set of sample points the comparison is evaluated on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOn {
    /// Interpolate the reference at the computed points.
    #[default]
    Computed,
    /// Interpolate the computed curve at the reference points.
    Reference,
}

/// Result of comparing a computed curve with a reference curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveComparison {
    pub x: Vec<f64>,
    pub computed: Vec<f64>,
    pub reference: Vec<f64>,
    pub error_percent: f64,
}

/// `mean(|(computed - reference) / reference|) * 100`.
///
/// The ratio is signed before the absolute value, so negative references
/// (CL below zero lift) count as positive errors. The reference is not guarded
/// against zero; the resulting inf or NaN is returned as is and logged.
pub fn mean_abs_percent_error(computed: &[f64], reference: &[f64]) -> CompareResult<f64> {
    if computed.len() != reference.len() {
        return Err(AvError::LengthMismatch {
            what: "percent error",
            left: computed.len(),
            right: reference.len(),
        }
        .into());
    }
    let ratios: Vec<f64> = computed
        .iter()
        .zip(reference)
        .map(|(c, r)| ((c - r) / r).abs())
        .collect();
    let Some(m) = mean(&ratios) else {
        return Err(AvError::TooFewPoints {
            what: "percent error",
            needed: 1,
            got: 0,
        }
        .into());
    };
    let pct = m * 100.0;
    if !pct.is_finite() {
        warn!(value = pct, "percent error is not finite");
    }
    Ok(pct)
}

pub fn compare_curves(
    computed_x: &[f64],
    computed_y: &[f64],
    reference_x: &[f64],
    reference_y: &[f64],
    on: SampleOn,
) -> CompareResult<CurveComparison> {
    let (x, computed, reference) = match on {
        SampleOn::Computed => {
            let f = Interp1d::new(reference_x, reference_y)?;
            if computed_x.len() != computed_y.len() {
                return Err(AvError::LengthMismatch {
                    what: "computed curve",
                    left: computed_x.len(),
                    right: computed_y.len(),
                }
                .into());
            }
            (computed_x.to_vec(), computed_y.to_vec(), f.sample(computed_x))
        }
        SampleOn::Reference => {
            let f = Interp1d::new(computed_x, computed_y)?;
            if reference_x.len() != reference_y.len() {
                return Err(AvError::LengthMismatch {
                    what: "reference curve",
                    left: reference_x.len(),
                    right: reference_y.len(),
                }
                .into());
            }
            (reference_x.to_vec(), f.sample(reference_x), reference_y.to_vec())
        }
    };
    let error_percent = mean_abs_percent_error(&computed, &reference)?;
    Ok(CurveComparison {
        x,
        computed,
        reference,
        error_percent,
    })
}

/// Mean finite-difference slope of `y` over `x`.
pub fn mean_slope(x: &[f64], y: &[f64]) -> CompareResult<f64> {
    if x.len() != y.len() {
        return Err(AvError::LengthMismatch {
            what: "slope samples",
            left: x.len(),
            right: y.len(),
        }
        .into());
    }
    let slopes: Vec<f64> = diff(y).iter().zip(diff(x)).map(|(dy, dx)| dy / dx).collect();
    mean(&slopes).ok_or_else(|| {
        AvError::TooFewPoints {
            what: "slope",
            needed: 2,
            got: x.len(),
        }
        .into()
    })
}

/// Slope per radian of a polar quantity against alpha in degrees (dCL/dalpha
/// for lift, dCM/dalpha for moment).
pub fn alpha_slope(alpha_deg: &[f64], y: &[f64]) -> CompareResult<f64> {
    Ok(per_degree_to_per_radian(mean_slope(alpha_deg, y)?))
}

/// Lift-curve slope per radian from the first two polar points only.
pub fn two_point_slope(alpha_deg: &[f64], cl: &[f64]) -> CompareResult<f64> {
    if alpha_deg.len() < 2 || cl.len() < 2 {
        return Err(AvError::TooFewPoints {
            what: "two-point slope",
            needed: 2,
            got: alpha_deg.len().min(cl.len()),
        }
        .into());
    }
    alpha_slope(&alpha_deg[..2], &cl[..2])
}

/// `|(value - reference) / reference| * 100`, the single-value form of
/// [`mean_abs_percent_error`].
pub fn slope_error(value: f64, reference: f64) -> f64 {
    let pct = ((value - reference) / reference).abs() * 100.0;
    if !pct.is_finite() {
        warn!(value, reference, "slope error is not finite");
    }
    pct
}

/// Default CL grid for the moment slope.
pub fn default_cl_grid() -> Vec<f64> {
    linspace(-0.25, 0.25, 10)
}

/// dCM/dCL: CM interpolated onto `cl_grid`, then the mean slope.
pub fn moment_slope(cl: &[f64], cm: &[f64], cl_grid: &[f64]) -> CompareResult<f64> {
    let f = Interp1d::new(cl, cm)?;
    mean_slope(cl_grid, &f.sample(cl_grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompareError;

    #[test]
    fn percent_error_matches_hand_value() {
        let pct = mean_abs_percent_error(&[1.0, 2.0, 3.0], &[1.1, 1.9, 3.3]).unwrap();
        // (0.1/1.1 + 0.1/1.9 + 0.3/3.3) / 3
        assert!((pct - 7.814992).abs() < 1e-5, "{pct}");
    }

    #[test]
    fn negative_references_do_not_cancel() {
        let pct = mean_abs_percent_error(&[-1.1], &[-1.0]).unwrap();
        assert!((pct - 10.0).abs() < 1e-9, "{pct}");

        // Symmetric lift curve, 10% high on both sides of zero lift.
        let pct = mean_abs_percent_error(&[-0.22, 0.22], &[-0.2, 0.2]).unwrap();
        assert!((pct - 10.0).abs() < 1e-9, "{pct}");
    }

    #[test]
    fn zero_reference_is_not_guarded() {
        let pct = mean_abs_percent_error(&[1.0, 2.0], &[0.0, 2.0]).unwrap();
        assert!(pct.is_infinite());
        let pct = mean_abs_percent_error(&[0.0], &[0.0]).unwrap();
        assert!(pct.is_nan());
    }

    #[test]
    fn percent_error_rejects_mismatch_and_empty() {
        assert!(matches!(
            mean_abs_percent_error(&[1.0], &[1.0, 2.0]),
            Err(CompareError::Core(AvError::LengthMismatch { .. }))
        ));
        assert!(matches!(
            mean_abs_percent_error(&[], &[]),
            Err(CompareError::Core(AvError::TooFewPoints { .. }))
        ));
    }

    #[test]
    fn alpha_slope_of_thin_airfoil_line() {
        let two_pi = 2.0 * std::f64::consts::PI;
        let alpha: Vec<f64> = (-4..=8).map(f64::from).collect();
        let cl: Vec<f64> = alpha.iter().map(|a| two_pi * a.to_radians()).collect();
        assert!((alpha_slope(&alpha, &cl).unwrap() - two_pi).abs() < 1e-9);
        assert!((two_point_slope(&alpha, &cl).unwrap() - two_pi).abs() < 1e-9);
    }

    #[test]
    fn two_point_slope_ignores_later_points() {
        let alpha = [0.0, 1.0, 2.0];
        let cl = [0.0, 0.05, 1.0];
        let a = two_point_slope(&alpha, &cl).unwrap();
        assert!((a - 0.05 * 180.0 / std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn slope_error_is_absolute_percentage() {
        assert!((slope_error(3.3, 3.0) - 10.0).abs() < 1e-9);
        assert!((slope_error(2.7, 3.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn moment_slope_on_default_grid() {
        let cl = [-0.4, -0.2, 0.0, 0.2, 0.4];
        let cm: Vec<f64> = cl.iter().map(|c| 0.01 - 0.12 * c).collect();
        let s = moment_slope(&cl, &cm, &default_cl_grid()).unwrap();
        assert!((s + 0.12).abs() < 1e-9);
    }

    #[test]
    fn compare_on_either_sample_set() {
        let cx = [0.0, 1.0, 2.0];
        let cy = [0.0, 1.0, 2.0];
        let rx = [0.0, 2.0];
        let ry = [0.0, 2.2];
        let on_computed = compare_curves(&cx, &cy, &rx, &ry, SampleOn::Computed).unwrap();
        assert_eq!(on_computed.x, cx.to_vec());
        assert!((on_computed.reference[1] - 1.1).abs() < 1e-12);

        let on_reference = compare_curves(&cx, &cy, &rx, &ry, SampleOn::Reference).unwrap();
        assert_eq!(on_reference.x, rx.to_vec());
        assert_eq!(on_reference.computed, vec![0.0, 2.0]);
        // First reference point is zero.
        assert!(on_reference.error_percent.is_nan());
    }
}
