use crate::WfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// Tolerance on the sum of a probability mass function.
pub const PROBABILITY_SUM_TOL: Real = 1e-6;

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, WfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WfError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, WfError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(WfError::OutOfRange { what, value: v })
    }
}

/// Check that `values` is non-empty, finite and strictly increasing.
pub fn ensure_strictly_increasing(values: &[Real], what: &'static str) -> Result<(), WfError> {
    if values.is_empty() {
        return Err(WfError::InvalidArg { what });
    }
    for &v in values {
        ensure_finite(v, what)?;
    }
    if values.windows(2).any(|w| w[1] <= w[0]) {
        return Err(WfError::Invariant { what });
    }
    Ok(())
}

/// Uniform spacing of an axis, if it has one. A single-value axis has no spacing.
pub fn uniform_step(values: &[Real]) -> Option<Real> {
    if values.len() < 2 {
        return None;
    }
    let step = values[1] - values[0];
    let tol = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };
    values
        .windows(2)
        .all(|w| nearly_equal(w[1] - w[0], step, tol))
        .then_some(step)
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<Real>() / values.len() as Real)
    }
}

/// Signed shortest angular difference `a - b` in degrees, in [-180, 180).
pub fn angle_diff_deg(a: Real, b: Real) -> Real {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "scale").is_err());
        assert_eq!(ensure_positive(2.5, "scale").unwrap(), 2.5);
    }

    #[test]
    fn strictly_increasing_checks() {
        assert!(ensure_strictly_increasing(&[1.0, 2.0, 3.0], "axis").is_ok());
        assert!(ensure_strictly_increasing(&[1.0, 1.0], "axis").is_err());
        assert!(ensure_strictly_increasing(&[], "axis").is_err());
        assert!(ensure_strictly_increasing(&[1.0, Real::INFINITY], "axis").is_err());
    }

    #[test]
    fn uniform_step_detection() {
        assert_eq!(uniform_step(&[0.0, 10.0, 20.0]), Some(10.0));
        assert_eq!(uniform_step(&[0.0, 10.0, 25.0]), None);
        assert_eq!(uniform_step(&[5.0]), None);
    }

    #[test]
    fn angle_diff_wraps() {
        assert!((angle_diff_deg(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((angle_diff_deg(350.0, 10.0) + 20.0).abs() < 1e-12);
        assert!((angle_diff_deg(0.0, 270.0) - 90.0).abs() < 1e-12);
    }
}
