//! Turbine layout.

use nalgebra::Vector2;
use wf_core::{TurbineId, WfError, WfResult, ensure_finite, ensure_positive, turbine_ids};

/// Ordered turbine positions in meters; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    positions: Vec<Vector2<f64>>,
}

impl Layout {
    /// Build a layout from coordinate vectors.
    ///
    /// # Errors
    /// Fails for empty or unequal-length vectors and non-finite coordinates.
    pub fn new(x: &[f64], y: &[f64]) -> WfResult<Self> {
        if x.is_empty() {
            return Err(WfError::InvalidArg {
                what: "layout must contain at least one turbine",
            });
        }
        if x.len() != y.len() {
            return Err(WfError::LengthMismatch {
                what: "layout y coordinates",
                expected: x.len(),
                got: y.len(),
            });
        }
        let positions = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| {
                Ok(Vector2::new(
                    ensure_finite(xi, "layout x")?,
                    ensure_finite(yi, "layout y")?,
                ))
            })
            .collect::<WfResult<Vec<_>>>()?;
        Ok(Self { positions })
    }

    /// West-east row: `x = i * spacing`, `y = 0`.
    pub fn row(count: usize, spacing_m: f64) -> WfResult<Self> {
        if count == 0 {
            return Err(WfError::InvalidArg {
                what: "turbine count must be at least 1",
            });
        }
        let spacing = ensure_positive(spacing_m, "turbine spacing")?;
        let x: Vec<f64> = (0..count).map(|i| i as f64 * spacing).collect();
        Self::new(&x, &vec![0.0; count])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the layout has no turbines.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.positions
    }

    pub fn x(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p.x).collect()
    }

    pub fn y(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p.y).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = TurbineId> {
        turbine_ids(self.len())
    }

    /// Smallest distance between any two turbines; `None` for a single turbine.
    pub fn min_spacing(&self) -> Option<f64> {
        let mut best: Option<f64> = None;
        for (i, a) in self.positions.iter().enumerate() {
            for b in &self.positions[i + 1..] {
                let d = (a - b).norm();
                best = Some(best.map_or(d, |cur| cur.min(d)));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_layout_positions() {
        let layout = Layout::row(3, 400.0).unwrap();
        assert_eq!(layout.x(), vec![0.0, 400.0, 800.0]);
        assert_eq!(layout.y(), vec![0.0, 0.0, 0.0]);
        assert_eq!(layout.min_spacing(), Some(400.0));
    }

    #[test]
    fn rejects_invalid_layouts() {
        assert!(Layout::new(&[], &[]).is_err());
        assert!(Layout::new(&[0.0, 1.0], &[0.0]).is_err());
        assert!(Layout::new(&[f64::NAN], &[0.0]).is_err());
        assert!(Layout::row(0, 400.0).is_err());
        assert!(Layout::row(2, -5.0).is_err());
    }

    #[test]
    fn single_turbine_has_no_spacing() {
        let layout = Layout::new(&[10.0], &[20.0]).unwrap();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.min_spacing(), None);
    }
}
