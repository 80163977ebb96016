//! Construction of the directional Weibull resource grid.
//!
//! The site model is deliberately simple and smooth:
//!
//! ```text
//! A(d)    = A0 + dA * cos(d - phase)
//! k(d)    = k0 + dk * sin(d)
//! f(d)    = exp(-0.5 * ((d - prevailing) / spread)^2) / sum(...)
//! ```
//!
//! The distance to the prevailing bearing is the plain difference in degrees,
//! not wrapped around north, so sectors just east of north get almost no
//! weight when the prevailing bearing is westerly. The Gaussian is always
//! renormalized over the sectors present in the grid.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wf_core::{WfError, ensure_finite, ensure_positive};

use crate::error::{ConfigurationError, ResourceResult};
use crate::grid::{Turbulence, WindResourceGrid, validate_directions, validate_speeds};

/// Parameters of the synthetic offshore site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceProfile {
    /// Baseline Weibull scale A (m/s)
    pub scale_base: f64,
    /// Amplitude of the sinusoidal scale modulation (m/s)
    pub scale_amplitude: f64,
    /// Direction at which the scale modulation peaks (deg)
    pub scale_phase_deg: f64,
    /// Baseline Weibull shape k
    pub shape_base: f64,
    /// Amplitude of the sinusoidal shape modulation
    pub shape_amplitude: f64,
    /// Centre of the sector-frequency Gaussian (deg)
    pub prevailing_direction_deg: f64,
    /// Angular spread of the sector-frequency Gaussian (deg)
    pub direction_spread_deg: f64,
    /// Constant turbulence intensity for every cell
    pub turbulence_intensity: f64,
}

impl Default for ResourceProfile {
    fn default() -> Self {
        Self {
            scale_base: 9.0,
            scale_amplitude: 1.5,
            scale_phase_deg: 180.0,
            shape_base: 2.1,
            shape_amplitude: 0.1,
            prevailing_direction_deg: 270.0,
            direction_spread_deg: 60.0,
            turbulence_intensity: 0.08,
        }
    }
}

impl ResourceProfile {
    fn validate(&self) -> ResourceResult<()> {
        ensure_finite(self.scale_base, "scale base")?;
        ensure_finite(self.scale_amplitude, "scale amplitude")?;
        ensure_finite(self.scale_phase_deg, "scale phase")?;
        ensure_finite(self.shape_base, "shape base")?;
        ensure_finite(self.shape_amplitude, "shape amplitude")?;
        ensure_finite(self.prevailing_direction_deg, "prevailing direction")?;
        ensure_positive(self.direction_spread_deg, "direction spread")?;
        ensure_finite(self.turbulence_intensity, "turbulence intensity")?;
        Ok(())
    }

    pub fn weibull_scale(&self, direction_deg: f64) -> f64 {
        self.scale_base
            + self.scale_amplitude * (direction_deg - self.scale_phase_deg).to_radians().cos()
    }

    pub fn weibull_shape(&self, direction_deg: f64) -> f64 {
        self.shape_base + self.shape_amplitude * direction_deg.to_radians().sin()
    }
}

/// Builds `WindResourceGrid`s from a `ResourceProfile`.
#[derive(Debug, Clone, Default)]
pub struct ResourceGridBuilder {
    profile: ResourceProfile,
}

impl ResourceGridBuilder {
    pub fn new(profile: ResourceProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ResourceProfile {
        &self.profile
    }

    /// Build the grid for the given direction (deg) and speed (m/s) axes.
    ///
    /// # Errors
    /// `ConfigurationError` for empty or malformed axes, non-finite profile
    /// parameters, or a profile that yields non-positive Weibull parameters.
    pub fn build(&self, directions: &[f64], speeds: &[f64]) -> ResourceResult<WindResourceGrid> {
        self.profile.validate()?;
        validate_directions(directions)?;
        validate_speeds(speeds)?;

        let scale: Vec<f64> = directions
            .iter()
            .map(|&d| self.profile.weibull_scale(d))
            .collect();
        let shape: Vec<f64> = directions
            .iter()
            .map(|&d| self.profile.weibull_shape(d))
            .collect();
        let frequency = sector_frequencies(
            directions,
            self.profile.prevailing_direction_deg,
            self.profile.direction_spread_deg,
        )?;

        debug!(
            directions = directions.len(),
            speeds = speeds.len(),
            "building wind resource grid"
        );

        WindResourceGrid::new(
            directions.to_vec(),
            speeds.to_vec(),
            scale,
            shape,
            frequency,
            Turbulence::Constant(self.profile.turbulence_intensity),
        )
    }
}

/// Gaussian sector frequencies around `prevailing_deg`, renormalized to sum to 1.
pub fn sector_frequencies(
    directions: &[f64],
    prevailing_deg: f64,
    spread_deg: f64,
) -> ResourceResult<Vec<f64>> {
    let spread = ensure_positive(spread_deg, "direction spread")?;
    let raw: Vec<f64> = directions
        .iter()
        .map(|&d| {
            let z = (d - prevailing_deg) / spread;
            (-0.5 * z * z).exp()
        })
        .collect();

    let sum: f64 = raw.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(ConfigurationError::Frequency { sum });
    }
    Ok(raw.into_iter().map(|f| f / sum).collect())
}

/// Upper bound on the number of points `axis` will generate.
pub const MAX_AXIS_POINTS: usize = 100_000;

/// Half-open uniform axis `[start, stop)` with the given step.
pub fn axis(start: f64, stop: f64, step: f64) -> ResourceResult<Vec<f64>> {
    ensure_finite(start, "axis start")?;
    ensure_finite(stop, "axis stop")?;
    let step = ensure_positive(step, "axis step")?;
    if stop <= start {
        return Err(WfError::InvalidArg {
            what: "axis stop must exceed start",
        }
        .into());
    }
    let n = ((stop - start) / step - 1e-9).ceil();
    if !n.is_finite() || n > MAX_AXIS_POINTS as f64 {
        return Err(WfError::InvalidArg {
            what: "axis step too small for the range",
        }
        .into());
    }
    let n = n as usize;
    Ok((0..n).map(|i| start + i as f64 * step).collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use wf_core::PROBABILITY_SUM_TOL;

    proptest! {
        #[test]
        fn sector_frequencies_sum_to_one(
            n in 1_usize..73,
            prevailing in 0.0_f64..360.0,
            spread in 20.0_f64..180.0,
        ) {
            let step = 360.0 / n as f64;
            let wd: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
            let grid = ResourceGridBuilder::new(ResourceProfile {
                prevailing_direction_deg: prevailing,
                direction_spread_deg: spread,
                ..Default::default()
            })
            .build(&wd, &[3.0, 4.0, 5.0])
            .unwrap();
            let sum: f64 = grid.sector_frequency().sum();
            prop_assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOL);
            prop_assert!(grid.sector_frequency().iter().all(|&f| f >= 0.0));
        }
    }
}
