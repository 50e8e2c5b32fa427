//! Qualitative force-vs-distance curves for the force-comparison graphs.
//!
//! These are shaped curves, not physical models: the strong force is a
//! shifted `u·e^(-u)` well and the electromagnetic repulsion a softened power
//! law. Distances are in femtometres on the graph's axis.

use crate::error::{Error, Result};

/// Upper bound on the number of points one `sample` call may produce.
pub const MAX_SAMPLES: usize = 1_000_000;

/// A scalar force curve sampled over distance.
pub trait ForceCurve {
    /// Force strength at `distance`.
    fn eval(&self, distance: f64) -> f64;

    /// Sample `(distance, force)` points from `start` to `end` in steps of `step`.
    ///
    /// `start` is always included; `end` is included when it lands on a step.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `step` is not finite and > 0, `end < start`, or the
    ///   range would need more than [`MAX_SAMPLES`] points.
    fn sample(&self, start: f64, end: f64, step: f64) -> Result<Vec<[f64; 2]>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(Error::InvalidParam("step must be finite and > 0".into()));
        }
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(Error::InvalidParam(
                "range must be finite with end >= start".into(),
            ));
        }
        // Tolerate accumulated rounding at the far end
        let steps = ((end - start) / step + 1e-9).floor();
        if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
            return Err(Error::InvalidParam(format!(
                "sampling would produce more than {MAX_SAMPLES} points"
            )));
        }
        let count = steps as usize + 1;
        Ok((0..count)
            .map(|i| {
                let x = start + step * i as f64;
                [x, self.eval(x)]
            })
            .collect())
    }
}

/// Strong-force curve `c · u · e^(-u)` with `u = a·x + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrongForceCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for StrongForceCurve {
    fn default() -> Self {
        Self {
            a: 2.0,
            b: -0.95,
            c: -5.0,
        }
    }
}

impl ForceCurve for StrongForceCurve {
    fn eval(&self, distance: f64) -> f64 {
        let u = self.a * distance + self.b;
        self.c * u / u.exp()
    }
}

/// Electromagnetic repulsion `a · (x - b)^(-0.8) + 0.3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmForceCurve {
    pub a: f64,
    pub b: f64,
}

impl Default for EmForceCurve {
    fn default() -> Self {
        Self { a: 0.7, b: 0.2 }
    }
}

impl ForceCurve for EmForceCurve {
    fn eval(&self, distance: f64) -> f64 {
        self.a * (distance - self.b).powf(-0.8) + 0.3
    }
}

/// Whether the strong attraction outweighs the electromagnetic repulsion at `distance`.
pub fn is_bound(distance: f64, strong: &impl ForceCurve, em: &impl ForceCurve) -> bool {
    strong.eval(distance).abs() > em.eval(distance).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_force_changes_sign_at_offset() {
        let s = StrongForceCurve::default();
        // u = 0 at x = 0.475
        assert!(s.eval(0.475).abs() < 1e-12);
        assert!(s.eval(0.3) > 0.0);
        assert!(s.eval(1.0) < 0.0);
        // Decays towards zero at long range
        assert!(s.eval(4.0).abs() < 0.05);
    }

    #[test]
    fn em_force_decreases_with_distance() {
        let e = EmForceCurve::default();
        assert!(e.eval(0.5) > e.eval(1.0));
        assert!(e.eval(1.0) > e.eval(3.0));
        assert!(e.eval(3.0) > 0.3);
    }

    #[test]
    fn sample_includes_both_ends() -> Result<()> {
        let pts = EmForceCurve::default().sample(0.3, 4.0, 0.05)?;
        assert_eq!(pts.len(), 75);
        assert!((pts[0][0] - 0.3).abs() < 1e-12);
        assert!((pts[74][0] - 4.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn sample_rejects_bad_ranges() -> Result<()> {
        let s = StrongForceCurve::default();
        assert!(s.sample(0.0, 1.0, 0.0).is_err());
        assert!(s.sample(2.0, 1.0, 0.1).is_err());
        let err = s.sample(0.0, 1.0, 1e-300).unwrap_err();
        assert!(err.to_string().contains("more than"));
        assert!(s.sample(0.0, MAX_SAMPLES as f64, 1.0).is_err());
        assert_eq!(s.sample(0.0, 999.0, 1.0)?.len(), 1000);
        Ok(())
    }

    #[test]
    fn stronger_well_binds_at_one_femtometre() {
        let em = EmForceCurve { a: 1.2, b: 0.2 };
        let weak = StrongForceCurve {
            c: -7.0,
            ..Default::default()
        };
        let strong = StrongForceCurve {
            c: -10.0,
            ..Default::default()
        };
        assert!(is_bound(1.0, &StrongForceCurve::default(), &EmForceCurve::default()));
        assert!(is_bound(1.0, &strong, &em));
        assert!(strong.eval(1.0).abs() > weak.eval(1.0).abs());
    }
}
