//! Simulation requests.

use std::slice;

use wf_resource::WindResourceGrid;

use crate::layout::Layout;

/// Direction or speed selection. A scalar collapses the axis in the output.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSelection {
    Scalar(f64),
    Values(Vec<f64>),
}

impl AxisSelection {
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => slice::from_ref(v),
            Self::Values(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// True when the axis is dropped from the engine output.
    pub fn is_collapsed(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

impl From<f64> for AxisSelection {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for AxisSelection {
    fn from(v: Vec<f64>) -> Self {
        Self::Values(v)
    }
}

/// Effective turbulence intensity for a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurbulenceSpec {
    /// Same TI for every cell, overriding the grid.
    Scalar(f64),
    /// Use the grid's TI at (or nearest to) each requested cell.
    FromGrid,
}

/// One call into a wake engine.
///
/// Requested directions and speeds may lie outside the grid's domain; the
/// engine is expected to extrapolate and nothing here validates them.
#[derive(Debug, Clone)]
pub struct SimulationRequest<'a> {
    pub grid: &'a WindResourceGrid,
    pub layout: &'a Layout,
    pub directions: AxisSelection,
    pub speeds: AxisSelection,
    pub turbulence: TurbulenceSpec,
}

impl<'a> SimulationRequest<'a> {
    /// Every grid direction and speed, TI from the grid. Output is rank 3.
    pub fn full_grid(grid: &'a WindResourceGrid, layout: &'a Layout) -> Self {
        Self {
            grid,
            layout,
            directions: AxisSelection::Values(grid.directions().to_vec()),
            speeds: AxisSelection::Values(grid.speeds().to_vec()),
            turbulence: TurbulenceSpec::FromGrid,
        }
    }

    /// Explicit direction/speed selections.
    pub fn subset(
        grid: &'a WindResourceGrid,
        layout: &'a Layout,
        directions: impl Into<AxisSelection>,
        speeds: impl Into<AxisSelection>,
        turbulence: TurbulenceSpec,
    ) -> Self {
        Self {
            grid,
            layout,
            directions: directions.into(),
            speeds: speeds.into(),
            turbulence,
        }
    }

    /// Single operating point with a TI override. Output is rank 1.
    pub fn point(
        grid: &'a WindResourceGrid,
        layout: &'a Layout,
        speed: f64,
        direction_deg: f64,
        turbulence_intensity: f64,
    ) -> Self {
        Self::subset(
            grid,
            layout,
            AxisSelection::Scalar(direction_deg),
            AxisSelection::Scalar(speed),
            TurbulenceSpec::Scalar(turbulence_intensity),
        )
    }

    pub fn with_turbulence(mut self, turbulence_intensity: f64) -> Self {
        self.turbulence = TurbulenceSpec::Scalar(turbulence_intensity);
        self
    }

    pub fn turbine_count(&self) -> usize {
        self.layout.len()
    }

    /// Effective TI at a requested (direction, speed) pair.
    pub fn turbulence_for(&self, direction_deg: f64, speed: f64) -> f64 {
        match self.turbulence {
            TurbulenceSpec::Scalar(ti) => ti,
            TurbulenceSpec::FromGrid => self.grid.turbulence_near(direction_deg, speed),
        }
    }

    /// Output shape implied by the selections (collapsed axes dropped).
    pub fn output_shape(&self) -> Vec<usize> {
        let mut shape = vec![self.turbine_count()];
        if !self.directions.is_collapsed() {
            shape.push(self.directions.len());
        }
        if !self.speeds.is_collapsed() {
            shape.push(self.speeds.len());
        }
        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_resource::{ResourceGridBuilder, axis};

    fn grid() -> WindResourceGrid {
        ResourceGridBuilder::default()
            .build(&axis(0.0, 360.0, 30.0).unwrap(), &axis(4.0, 20.0, 4.0).unwrap())
            .unwrap()
    }

    #[test]
    fn output_shape_follows_selections() {
        let grid = grid();
        let layout = Layout::row(3, 400.0).unwrap();

        let req = SimulationRequest::full_grid(&grid, &layout);
        assert_eq!(req.output_shape(), vec![3, 12, 4]);

        let req = SimulationRequest::point(&grid, &layout, 12.0, 270.0, 0.1);
        assert_eq!(req.output_shape(), vec![3]);

        let req = SimulationRequest::subset(
            &grid,
            &layout,
            270.0,
            vec![4.0, 8.0],
            TurbulenceSpec::FromGrid,
        );
        assert_eq!(req.output_shape(), vec![3, 2]);
    }

    #[test]
    fn turbulence_override_wins() {
        let grid = grid();
        let layout = Layout::row(1, 1.0).unwrap();
        let req = SimulationRequest::full_grid(&grid, &layout);
        assert_eq!(req.turbulence_for(0.0, 8.0), 0.08);
        let req = req.with_turbulence(0.12);
        assert_eq!(req.turbulence_for(0.0, 8.0), 0.12);
    }
}
