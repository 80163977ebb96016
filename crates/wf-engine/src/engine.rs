//! WakeEngine trait for pluggable wake-deficit models.

use crate::error::EngineResult;
use crate::request::SimulationRequest;
use crate::tensor::RawPowerTensor;

/// Everything an engine call can hand back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOutput {
    /// Per-turbine power tensor, if the engine produced one.
    pub power: Option<RawPowerTensor>,
    /// The engine's own AEP aggregate (GWh), weighted by its own convention.
    pub aep_gwh: Option<f64>,
}

/// A wake-deficit engine.
///
/// Implementations must be deterministic and free of side effects so that
/// independent calls can run on separate workers.
pub trait WakeEngine: Send + Sync {
    /// Engine name for reports and logs.
    fn name(&self) -> &str;

    /// Run one simulation.
    ///
    /// The output tensor has one axis for turbines plus one axis for each
    /// direction/speed selection that is a sequence (scalars collapse).
    fn simulate(&self, request: &SimulationRequest<'_>) -> EngineResult<EngineOutput>;
}

impl<E: WakeEngine + ?Sized> WakeEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn simulate(&self, request: &SimulationRequest<'_>) -> EngineResult<EngineOutput> {
        (**self).simulate(request)
    }
}

impl<E: WakeEngine + ?Sized> WakeEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn simulate(&self, request: &SimulationRequest<'_>) -> EngineResult<EngineOutput> {
        (**self).simulate(request)
    }
}
