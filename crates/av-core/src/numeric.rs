use crate::AvError;

/// Floating point type used throughout system
pub type Real = f64;

/// Evenly spaced samples over `[start, end]`, endpoint included.
///
/// `n == 1` yields `[start]` and `n == 0` yields an empty vector.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            // Ensure exact endpoint
            points[n - 1] = end;
            points
        }
    }
}

/// Half-open stepped range `[start, stop)`.
pub fn arange(start: Real, stop: Real, step: Real) -> Result<Vec<Real>, AvError> {
    if step == 0.0 || !step.is_finite() {
        return Err(AvError::InvalidArg {
            what: "arange step must be finite and non-zero",
        });
    }
    let count = ((stop - start) / step).ceil();
    if count <= 0.0 {
        return Ok(Vec::new());
    }
    Ok((0..count as usize).map(|i| start + i as Real * step).collect())
}

/// Consecutive differences `v[i+1] - v[i]`.
pub fn diff(values: &[Real]) -> Vec<Real> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

pub fn mean(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<Real>() / values.len() as Real)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_hits_both_endpoints(start in -20.0f64..20.0, span in 0.1f64..40.0, n in 2usize..64) {
            let end = start + span;
            let pts = linspace(start, end, n);
            prop_assert_eq!(pts.len(), n);
            prop_assert_eq!(pts[0], start);
            prop_assert_eq!(pts[n - 1], end);
            prop_assert!(pts.windows(2).all(|w| w[1] > w[0]));
        }
    }
}
