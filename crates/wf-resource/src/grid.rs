//! Immutable direction x speed wind-resource grid.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use wf_core::{
    PROBABILITY_SUM_TOL, WfError, angle_diff_deg, ensure_finite, ensure_strictly_increasing, mean,
    uniform_step,
};

use crate::error::{ConfigurationError, ResourceResult};
use crate::weibull::Weibull;

/// Turbulence intensity description of a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Turbulence {
    /// One value for every cell.
    Constant(f64),
    /// One value per (direction, speed) cell.
    PerCell(Array2<f64>),
}

/// Direction/speed-resolved Weibull wind resource.
///
/// Invariants (checked at construction, never re-checked):
/// - directions strictly increasing, within [0, 360), uniformly spaced and
///   covering the full circle (`step * len == 360`); a single direction is
///   one omnidirectional 360 deg sector
/// - speeds strictly increasing and positive
/// - Weibull parameters positive
/// - sector frequencies non-negative and summing to 1
/// - every TI value in (0, 1)
#[derive(Debug, Clone, PartialEq)]
pub struct WindResourceGrid {
    directions: Array1<f64>,
    speeds: Array1<f64>,
    weibull_scale: Array1<f64>,
    weibull_shape: Array1<f64>,
    sector_frequency: Array1<f64>,
    turbulence: Turbulence,
}

/// One row of the wind rose table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorRow {
    pub direction_deg: f64,
    pub weibull_a: f64,
    pub weibull_k: f64,
    pub frequency: f64,
}

/// Site-level summary statistics shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub direction_count: usize,
    pub speed_count: usize,
    pub mean_weibull_a: f64,
    pub mean_weibull_k: f64,
    pub mean_turbulence: f64,
    pub frequency_sum: f64,
}

impl WindResourceGrid {
    /// Assemble a grid from already-computed per-sector tables.
    pub fn new(
        directions: Vec<f64>,
        speeds: Vec<f64>,
        weibull_scale: Vec<f64>,
        weibull_shape: Vec<f64>,
        sector_frequency: Vec<f64>,
        turbulence: Turbulence,
    ) -> ResourceResult<Self> {
        validate_directions(&directions)?;
        validate_speeds(&speeds)?;

        let n_dir = directions.len();
        for (what, table) in [
            ("weibull scale", &weibull_scale),
            ("weibull shape", &weibull_shape),
            ("sector frequency", &sector_frequency),
        ] {
            if table.len() != n_dir {
                return Err(WfError::LengthMismatch {
                    what,
                    expected: n_dir,
                    got: table.len(),
                }
                .into());
            }
        }
        for (&a, &k) in weibull_scale.iter().zip(&weibull_shape) {
            Weibull::new(a, k)?;
        }

        for &f in &sector_frequency {
            ensure_finite(f, "sector frequency")?;
            if f < 0.0 {
                return Err(WfError::OutOfRange {
                    what: "sector frequency",
                    value: f,
                }
                .into());
            }
        }
        let sum: f64 = sector_frequency.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOL {
            return Err(ConfigurationError::Frequency { sum });
        }

        validate_turbulence(&turbulence, (n_dir, speeds.len()))?;

        Ok(Self {
            directions: Array1::from(directions),
            speeds: Array1::from(speeds),
            weibull_scale: Array1::from(weibull_scale),
            weibull_shape: Array1::from(weibull_shape),
            sector_frequency: Array1::from(sector_frequency),
            turbulence,
        })
    }

    /// Copy of this grid with a per-cell TI table.
    pub fn with_turbulence_grid(&self, values: Array2<f64>) -> ResourceResult<Self> {
        let turbulence = Turbulence::PerCell(values);
        validate_turbulence(&turbulence, self.shape())?;
        Ok(Self {
            turbulence,
            ..self.clone()
        })
    }

    pub fn directions(&self) -> &Array1<f64> {
        &self.directions
    }

    pub fn speeds(&self) -> &Array1<f64> {
        &self.speeds
    }

    pub fn weibull_scale(&self) -> &Array1<f64> {
        &self.weibull_scale
    }

    pub fn weibull_shape(&self) -> &Array1<f64> {
        &self.weibull_shape
    }

    pub fn sector_frequency(&self) -> &Array1<f64> {
        &self.sector_frequency
    }

    pub fn turbulence(&self) -> &Turbulence {
        &self.turbulence
    }

    /// `(directions, speeds)`
    pub fn shape(&self) -> (usize, usize) {
        (self.directions.len(), self.speeds.len())
    }

    pub fn cell_count(&self) -> usize {
        self.directions.len() * self.speeds.len()
    }

    /// Weibull distribution of sector `d`.
    pub fn weibull(&self, d: usize) -> Weibull {
        Weibull {
            scale: self.weibull_scale[d],
            shape: self.weibull_shape[d],
        }
    }

    /// Width of each speed bin. Interior bins span half the distance to each
    /// neighbour; the end bins mirror their single neighbour. A single-speed
    /// grid uses a 1 m/s bin.
    pub fn speed_bin_widths(&self) -> Array1<f64> {
        Array1::from(bin_widths(self.speeds.as_slice().unwrap_or(&[])))
    }

    /// Probability weight of cell (d, s): `freq[d] * pdf(s; A[d], k[d]) * Δs`.
    pub fn cell_weights(&self) -> Array2<f64> {
        let widths = self.speed_bin_widths();
        Array2::from_shape_fn(self.shape(), |(d, s)| {
            self.sector_frequency[d] * self.weibull(d).bin_probability(self.speeds[s], widths[s])
        })
    }

    /// TI at grid cell (d, s).
    pub fn turbulence_at(&self, d: usize, s: usize) -> f64 {
        match &self.turbulence {
            Turbulence::Constant(ti) => *ti,
            Turbulence::PerCell(values) => values[[d, s]],
        }
    }

    /// TI of the cell nearest to an arbitrary (direction, speed) pair.
    pub fn turbulence_near(&self, direction_deg: f64, speed: f64) -> f64 {
        match &self.turbulence {
            Turbulence::Constant(ti) => *ti,
            Turbulence::PerCell(_) => {
                let d = self.nearest_direction(direction_deg);
                let s = nearest_index(self.speeds.iter().copied(), |v| (v - speed).abs());
                self.turbulence_at(d, s)
            }
        }
    }

    /// Index of the sector closest to `direction_deg` on the circle.
    pub fn nearest_direction(&self, direction_deg: f64) -> usize {
        nearest_index(self.directions.iter().copied(), |d| {
            angle_diff_deg(d, direction_deg).abs()
        })
    }

    pub fn mean_turbulence(&self) -> f64 {
        match &self.turbulence {
            Turbulence::Constant(ti) => *ti,
            Turbulence::PerCell(values) => values.mean().unwrap_or(0.0),
        }
    }

    pub fn sector_table(&self) -> Vec<SectorRow> {
        (0..self.directions.len())
            .map(|d| SectorRow {
                direction_deg: self.directions[d],
                weibull_a: self.weibull_scale[d],
                weibull_k: self.weibull_shape[d],
                frequency: self.sector_frequency[d],
            })
            .collect()
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary {
            direction_count: self.directions.len(),
            speed_count: self.speeds.len(),
            mean_weibull_a: mean(self.weibull_scale.as_slice().unwrap_or(&[])).unwrap_or(0.0),
            mean_weibull_k: mean(self.weibull_shape.as_slice().unwrap_or(&[])).unwrap_or(0.0),
            mean_turbulence: self.mean_turbulence(),
            frequency_sum: self.sector_frequency.sum(),
        }
    }
}

const FULL_CIRCLE_DEG: f64 = 360.0;
const COVERAGE_TOL_DEG: f64 = 1e-6;

fn nearest_index(values: impl Iterator<Item = f64>, dist: impl Fn(f64) -> f64) -> usize {
    values
        .enumerate()
        .min_by(|a, b| dist(a.1).total_cmp(&dist(b.1)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(crate) fn validate_directions(directions: &[f64]) -> ResourceResult<()> {
    if directions.is_empty() {
        return Err(ConfigurationError::EmptyAxis { axis: "direction" });
    }
    ensure_strictly_increasing(directions, "direction axis").map_err(|_| {
        ConfigurationError::InvalidAxis {
            axis: "direction",
            reason: "values must be finite and strictly increasing",
        }
    })?;
    if directions.iter().any(|&d| !(0.0..360.0).contains(&d)) {
        return Err(ConfigurationError::InvalidAxis {
            axis: "direction",
            reason: "values must lie in [0, 360)",
        });
    }
    if directions.len() == 1 {
        return Ok(());
    }
    let step = uniform_step(directions).ok_or(ConfigurationError::InvalidAxis {
        axis: "direction",
        reason: "sectors must be uniformly spaced",
    })?;
    if (step * directions.len() as f64 - FULL_CIRCLE_DEG).abs() > COVERAGE_TOL_DEG {
        return Err(ConfigurationError::InvalidAxis {
            axis: "direction",
            reason: "sectors must cover the full circle",
        });
    }
    Ok(())
}

pub(crate) fn validate_speeds(speeds: &[f64]) -> ResourceResult<()> {
    if speeds.is_empty() {
        return Err(ConfigurationError::EmptyAxis { axis: "speed" });
    }
    ensure_strictly_increasing(speeds, "speed axis").map_err(|_| {
        ConfigurationError::InvalidAxis {
            axis: "speed",
            reason: "values must be finite and strictly increasing",
        }
    })?;
    if speeds[0] <= 0.0 {
        return Err(ConfigurationError::InvalidAxis {
            axis: "speed",
            reason: "values must be positive",
        });
    }
    Ok(())
}

fn validate_turbulence(turbulence: &Turbulence, shape: (usize, usize)) -> ResourceResult<()> {
    let check = |ti: f64| -> ResourceResult<()> {
        ensure_finite(ti, "turbulence intensity")?;
        if ti <= 0.0 || ti >= 1.0 {
            return Err(WfError::OutOfRange {
                what: "turbulence intensity",
                value: ti,
            }
            .into());
        }
        Ok(())
    };
    match turbulence {
        Turbulence::Constant(ti) => check(*ti),
        Turbulence::PerCell(values) => {
            if values.dim() != shape {
                return Err(ConfigurationError::Shape {
                    what: "turbulence grid",
                    expected: shape,
                    got: values.dim(),
                });
            }
            values.iter().try_for_each(|&ti| check(ti))
        }
    }
}

/// Midpoint-rule bin widths for a strictly increasing speed axis.
///
/// Interior bins extend halfway to each neighbour and the end bins take the
/// adjacent spacing. A single speed gets a unit-width bin.
pub fn bin_widths(speeds: &[f64]) -> Vec<f64> {
    let n = speeds.len();
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    speeds[1] - speeds[0]
                } else if i == n - 1 {
                    speeds[n - 1] - speeds[n - 2]
                } else {
                    0.5 * (speeds[i + 1] - speeds[i - 1])
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sector_grid() -> WindResourceGrid {
        WindResourceGrid::new(
            vec![0.0, 180.0],
            vec![4.0, 8.0, 12.0],
            vec![9.0, 10.0],
            vec![2.0, 2.2],
            vec![0.25, 0.75],
            Turbulence::Constant(0.08),
        )
        .unwrap()
    }

    #[test]
    fn rejects_frequencies_that_do_not_sum_to_one() {
        let err = WindResourceGrid::new(
            vec![0.0, 180.0],
            vec![4.0],
            vec![9.0, 9.0],
            vec![2.0, 2.0],
            vec![0.5, 0.6],
            Turbulence::Constant(0.08),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Frequency { .. }));
    }

    #[test]
    fn rejects_out_of_range_directions() {
        let err = validate_directions(&[0.0, 180.0, 360.0]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidAxis { .. }));
        assert!(validate_directions(&[0.0, 10.0, 30.0]).is_err());
        assert!(validate_directions(&[10.0, 0.0]).is_err());
    }

    #[test]
    fn directions_must_cover_the_circle() {
        let err = validate_directions(&[0.0, 10.0, 20.0]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidAxis {
                reason: "sectors must cover the full circle",
                ..
            }
        ));

        // 52 sectors of 7 deg overrun north by 4 deg
        let step7: Vec<f64> = (0..52).map(|i| i as f64 * 7.0).collect();
        assert!(validate_directions(&step7).is_err());

        let offset: Vec<f64> = (0..12).map(|i| 15.0 + i as f64 * 30.0).collect();
        assert!(validate_directions(&offset).is_ok());
        assert!(validate_directions(&[0.0, 180.0]).is_ok());
        // One omnidirectional sector
        assert!(validate_directions(&[270.0]).is_ok());
    }

    #[test]
    fn rejects_non_positive_speeds() {
        assert!(validate_speeds(&[0.0, 1.0]).is_err());
        assert!(validate_speeds(&[]).is_err());
        assert!(validate_speeds(&[3.0, 4.0, 6.0]).is_ok());
    }

    #[test]
    fn speed_bin_widths_follow_spacing() {
        let grid = two_sector_grid();
        let widths = grid.speed_bin_widths();
        assert_eq!(widths.to_vec(), vec![4.0, 4.0, 4.0]);
    }

    #[test]
    fn cell_weights_use_sector_frequency() {
        let grid = two_sector_grid();
        let w = grid.cell_weights();
        assert_eq!(w.dim(), (2, 3));
        let expected = 0.25 * grid.weibull(0).pdf(8.0) * 4.0;
        assert!((w[[0, 1]] - expected).abs() < 1e-15);
    }

    #[test]
    fn turbulence_grid_shape_is_checked() {
        let grid = two_sector_grid();
        assert!(grid.with_turbulence_grid(Array2::from_elem((2, 2), 0.1)).is_err());
        assert!(grid.with_turbulence_grid(Array2::from_elem((2, 3), 1.5)).is_err());

        let mut ti = Array2::from_elem((2, 3), 0.1);
        ti[[1, 2]] = 0.12;
        let grid = grid.with_turbulence_grid(ti).unwrap();
        assert_eq!(grid.turbulence_at(1, 2), 0.12);
        assert_eq!(grid.turbulence_near(175.0, 13.0), 0.12);
    }

    #[test]
    fn nearest_direction_wraps_around_north() {
        let grid = two_sector_grid();
        assert_eq!(grid.nearest_direction(350.0), 0);
        assert_eq!(grid.nearest_direction(200.0), 1);
    }
}
