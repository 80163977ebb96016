//! Two-parameter Weibull wind-speed distribution.

use crate::error::ResourceResult;
use wf_core::ensure_positive;

/// Weibull distribution with scale `A` (m/s) and shape `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weibull {
    pub scale: f64,
    pub shape: f64,
}

impl Weibull {
    pub fn new(scale: f64, shape: f64) -> ResourceResult<Self> {
        let scale = ensure_positive(scale, "weibull scale")?;
        let shape = ensure_positive(shape, "weibull shape")?;
        Ok(Self { scale, shape })
    }

    /// Probability density `(k/A) (v/A)^(k-1) exp(-(v/A)^k)`.
    ///
    /// Zero for non-positive speeds.
    pub fn pdf(&self, v: f64) -> f64 {
        if v <= 0.0 || !v.is_finite() {
            return 0.0;
        }
        let x = v / self.scale;
        (self.shape / self.scale) * x.powf(self.shape - 1.0) * (-x.powf(self.shape)).exp()
    }

    /// Probability mass assigned to a speed bin of the given width centered on `v`,
    /// using the rectangle rule `pdf(v) * width`.
    pub fn bin_probability(&self, v: f64, width: f64) -> f64 {
        self.pdf(v) * width
    }
}
