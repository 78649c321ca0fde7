//! Piecewise-linear interpolation that extrapolates past the sample range.

use av_core::AvError;

use crate::{CompareError, CompareResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Interp1d {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Interp1d {
    /// Samples are sorted by `x`. Exact duplicate points collapse to one;
    /// the same `x` with a different `y` is rejected.
    pub fn new(x: &[f64], y: &[f64]) -> CompareResult<Self> {
        if x.len() != y.len() {
            return Err(AvError::LengthMismatch {
                what: "interpolation samples",
                left: x.len(),
                right: y.len(),
            }
            .into());
        }
        let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.dedup();
        if points.len() < 2 {
            return Err(AvError::TooFewPoints {
                what: "interpolation",
                needed: 2,
                got: points.len(),
            }
            .into());
        }
        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CompareError::DuplicateAbscissa { x: w[0].0 });
        }
        let (xs, ys) = points.into_iter().unzip();
        Ok(Self { xs, ys })
    }

    pub fn at(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // Segment index; the end segments also serve for extrapolation.
        let i = match self.xs.partition_point(|&xi| xi <= x) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.at(x)).collect()
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
