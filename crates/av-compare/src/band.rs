use serde::{Deserialize, Serialize};

/// Symmetric relative band `value * (1 ± fraction)` around a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub fraction: f64,
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self { fraction: 0.05 }
    }
}

impl ToleranceBand {
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    /// Lower and upper bound, ordered even for negative references.
    pub fn bounds(&self, value: f64) -> (f64, f64) {
        let a = value * (1.0 - self.fraction);
        let b = value * (1.0 + self.fraction);
        (a.min(b), a.max(b))
    }

    pub fn contains(&self, reference: f64, value: f64) -> bool {
        let (lo, hi) = self.bounds(reference);
        (lo..=hi).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_band_is_five_percent() {
        let band = ToleranceBand::default();
        let (lo, hi) = band.bounds(4.0);
        assert!((lo - 3.8).abs() < 1e-12);
        assert!((hi - 4.2).abs() < 1e-12);
        assert!(band.contains(4.0, 4.1));
        assert!(!band.contains(4.0, 4.3));
    }

    #[test]
    fn negative_reference_keeps_order() {
        let (lo, hi) = ToleranceBand::new(0.1).bounds(-2.0);
        assert!(lo < hi);
        assert!((lo + 2.2).abs() < 1e-12);
    }
}
