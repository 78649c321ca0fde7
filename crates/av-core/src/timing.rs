//! Lightweight wall-clock timing for pipeline stages.
//!
//! The solver runs are the only expensive step, and tessellation sweeps
//! report their duration alongside the aerodynamic metrics.

use std::cell::Cell;
use std::time::Instant;

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Seconds since `start`, timer keeps running.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop the timer and return elapsed time in seconds.
    pub fn stop(self) -> f64 {
        self.elapsed_s()
    }
}

/// Accumulating timer for tracking total time across multiple calls.
#[derive(Default)]
pub struct AccumulatingTimer {
    total_s: Cell<f64>,
    count: Cell<u64>,
}

impl AccumulatingTimer {
    pub const fn new() -> Self {
        Self {
            total_s: Cell::new(0.0),
            count: Cell::new(0),
        }
    }

    /// Record a timing measurement.
    pub fn record(&self, duration_s: f64) {
        self.total_s.set(self.total_s.get() + duration_s);
        self.count.set(self.count.get() + 1);
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_s.get()
    }

    pub fn count(&self) -> u64 {
        self.count.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_reports_non_negative_elapsed() {
        let t = Timer::start("solver");
        assert_eq!(t.label(), "solver");
        assert!(t.stop() >= 0.0);
    }

    #[test]
    fn accumulating_timer_sums_runs() {
        let acc = AccumulatingTimer::new();
        assert_eq!(acc.count(), 0);
        acc.record(1.0);
        acc.record(3.0);
        assert_eq!(acc.count(), 2);
        assert!((acc.total_seconds() - 4.0).abs() < 1e-12);
    }
}
