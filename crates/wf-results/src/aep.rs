//! Annual energy production from per-cell farm power.
//!
//! Each (direction, speed) cell of the resource grid carries the weight
//!
//! ```text
//! w(d, s) = f(d) * pdf(s; A(d), k(d)) * ds
//! ```
//!
//! and the annual energy is `sum(P(d, s) * w(d, s)) * 8760 h`. When an engine
//! returns no usable per-cell breakdown, its own aggregate is passed through
//! but marked `PartialData`, since its weighting convention is unknown.

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wf_core::annual_gwh_from_kw;
use wf_engine::{EngineOutput, RawPowerTensor, TurbineModel, farm_power_by_cell, is_usable_power};
use wf_resource::WindResourceGrid;

use crate::normalize::ResultStatus;

/// Where an AEP figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AepSource {
    /// Cell-weighted integral over the resource grid.
    CellWeighted,
    /// The engine's own aggregate.
    EngineAggregate,
    /// Nothing usable.
    None,
}

/// Result of one energy integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AepEstimate {
    pub aep_gwh: Option<f64>,
    pub status: ResultStatus,
    pub source: AepSource,
}

impl AepEstimate {
    pub fn unavailable() -> Self {
        Self {
            aep_gwh: None,
            status: ResultStatus::Unavailable,
            source: AepSource::None,
        }
    }
}

/// Integrate farm power per cell (`[direction, speed]`, kW) into GWh/year.
///
/// Returns `None` when the array shape does not match the grid.
pub fn integrate_cells(grid: &WindResourceGrid, farm_power_kw: &Array2<f64>) -> Option<f64> {
    let (nd, ns) = grid.shape();
    if farm_power_kw.dim() != (nd, ns) {
        return None;
    }
    let weighted_kw = (farm_power_kw * &grid.cell_weights()).sum();
    Some(annual_gwh_from_kw(weighted_kw))
}

/// Rank-3 tensor whose condition axes match the grid, or `None`.
fn grid_shaped<'a>(
    grid: &WindResourceGrid,
    tensor: &'a RawPowerTensor,
) -> Option<&'a Array3<f64>> {
    let (nd, ns) = grid.shape();
    match tensor {
        RawPowerTensor::TurbineDirectionSpeed(v) if v.dim().1 == nd && v.dim().2 == ns => Some(v),
        _ => None,
    }
}

/// Integrate an engine output over the grid.
///
/// Never fails. The cell-weighted integral is preferred; absent cells inside
/// it count as zero and give `PartialData`. A tensor of any other shape falls
/// back to the engine aggregate (`PartialData`), and with neither available
/// the estimate is `Unavailable`.
pub fn integrate(grid: &WindResourceGrid, output: &EngineOutput) -> AepEstimate {
    let cells = output.power.as_ref().and_then(|t| grid_shaped(grid, t));

    if let Some(values) = cells {
        let has_absent = values.iter().any(|&p| !is_usable_power(p));
        let farm = farm_power_by_cell(values);
        if let Some(aep) = integrate_cells(grid, &farm) {
            let status = if has_absent {
                warn!("absent power cells counted as zero in AEP integral");
                ResultStatus::PartialData
            } else {
                ResultStatus::Ok
            };
            debug!(aep_gwh = aep, %status, "cell-weighted AEP");
            return AepEstimate {
                aep_gwh: Some(aep),
                status,
                source: AepSource::CellWeighted,
            };
        }
    }

    match output.aep_gwh.filter(|v| v.is_finite()) {
        Some(aep) => {
            warn!(
                shape = ?output.power.as_ref().map(RawPowerTensor::shape),
                "no per-cell power matching the grid, using engine aggregate"
            );
            AepEstimate {
                aep_gwh: Some(aep),
                status: ResultStatus::PartialData,
                source: AepSource::EngineAggregate,
            }
        }
        None => {
            warn!("AEP unavailable: no per-cell power and no engine aggregate");
            AepEstimate::unavailable()
        }
    }
}

/// Per-turbine AEP (GWh) from a grid-shaped rank-3 tensor, same weights as
/// `integrate`. Absent cells count as zero.
pub fn integrate_per_turbine(grid: &WindResourceGrid, tensor: &RawPowerTensor) -> Option<Vec<f64>> {
    let values = grid_shaped(grid, tensor)?;
    let weights = grid.cell_weights();
    Some(
        values
            .outer_iter()
            .map(|turbine| {
                let weighted_kw: f64 = turbine
                    .iter()
                    .zip(weights.iter())
                    .filter(|(p, _)| is_usable_power(**p))
                    .map(|(p, w)| p * w)
                    .sum();
                annual_gwh_from_kw(weighted_kw)
            })
            .collect(),
    )
}

/// Wake-free AEP of `count` identical turbines, each seeing the free-stream speed.
pub fn gross_aep<T: TurbineModel + ?Sized>(
    grid: &WindResourceGrid,
    turbine: &T,
    count: usize,
) -> f64 {
    let speeds = grid.speeds();
    let weighted_kw: f64 = grid
        .cell_weights()
        .indexed_iter()
        .map(|((_, s), w)| turbine.power_kw(speeds[s]) * w)
        .sum();
    annual_gwh_from_kw(weighted_kw * count as f64)
}
