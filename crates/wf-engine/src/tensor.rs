//! Rank-ambiguous power output of a wake engine.

use ndarray::{Array1, Array2, Array3, ArrayD, Axis, Ix1, Ix2, Ix3};

use crate::error::{EngineError, EngineResult};

/// Which request axis survived in a rank-2 tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaryingAxis {
    Direction,
    Speed,
    /// Produced by an engine that does not declare its axes.
    Unspecified,
}

/// Per-turbine power in kW, axis 0 always indexing turbines.
///
/// Non-finite entries mark turbines that produced no usable value
/// (fully shadowed).
#[derive(Debug, Clone, PartialEq)]
pub enum RawPowerTensor {
    /// `[turbine]`
    Turbine(Array1<f64>),
    /// `[turbine, direction|speed]`
    TurbineBy { axis: VaryingAxis, values: Array2<f64> },
    /// `[turbine, direction, speed]`
    TurbineDirectionSpeed(Array3<f64>),
}

impl RawPowerTensor {
    /// Classify a dynamic-rank array by its declared number of axes.
    pub fn from_dyn(values: ArrayD<f64>, varying: VaryingAxis) -> EngineResult<Self> {
        let rank = values.ndim();
        match rank {
            1 => values
                .into_dimensionality::<Ix1>()
                .map(Self::Turbine)
                .map_err(|_| EngineError::UnsupportedRank { rank }),
            2 => values
                .into_dimensionality::<Ix2>()
                .map(|values| Self::TurbineBy {
                    axis: varying,
                    values,
                })
                .map_err(|_| EngineError::UnsupportedRank { rank }),
            3 => values
                .into_dimensionality::<Ix3>()
                .map(Self::TurbineDirectionSpeed)
                .map_err(|_| EngineError::UnsupportedRank { rank }),
            _ => Err(EngineError::UnsupportedRank { rank }),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            Self::Turbine(_) => 1,
            Self::TurbineBy { .. } => 2,
            Self::TurbineDirectionSpeed(_) => 3,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Turbine(v) => v.shape().to_vec(),
            Self::TurbineBy { values, .. } => values.shape().to_vec(),
            Self::TurbineDirectionSpeed(v) => v.shape().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Turbine(v) => v.len(),
            Self::TurbineBy { values, .. } => values.len(),
            Self::TurbineDirectionSpeed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries along the turbine axis.
    pub fn turbine_count(&self) -> usize {
        self.shape()[0]
    }
}

/// Whether a power entry carries a usable value (finite, non-negative kW).
pub fn is_usable_power(p: f64) -> bool {
    p.is_finite() && p >= 0.0
}

/// Farm total power per (direction, speed) cell of a `[turbine, direction,
/// speed]` table. Unusable entries count as zero.
pub fn farm_power_by_cell(values: &Array3<f64>) -> Array2<f64> {
    values
        .mapv(|p| if is_usable_power(p) { p } else { 0.0 })
        .sum_axis(Axis(0))
}
