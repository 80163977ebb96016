//! Turbulence-intensity sensitivity sweep.
//!
//! Each sample is an independent single-point simulation. A failing sample
//! never aborts the sweep: it is recorded as zero power with its own status
//! and message, and the remaining samples still run.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wf_engine::{Layout, SimulationRequest, WakeEngine};
use wf_resource::WindResourceGrid;
use wf_results::{ResultStatus, normalize};

/// One point of the sensitivity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySample {
    pub turbulence_intensity: f64,
    /// Farm total power (kW); 0 when the sample failed.
    pub total_power_kw: f64,
    pub status: ResultStatus,
    /// Failure description when `status` is `Unavailable`.
    pub message: Option<String>,
}

impl SensitivitySample {
    fn failed(turbulence_intensity: f64, message: String) -> Self {
        Self {
            turbulence_intensity,
            total_power_kw: 0.0,
            status: ResultStatus::Unavailable,
            message: Some(message),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ResultStatus::Unavailable
    }

    /// `(ti, total power)` pair.
    pub fn point(&self) -> (f64, f64) {
        (self.turbulence_intensity, self.total_power_kw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Run samples on the rayon pool. Output order is unaffected.
    pub parallel: bool,
}

/// Drives repeated single-point simulations through one engine.
pub struct SensitivitySweepDriver<'e, E: WakeEngine + ?Sized> {
    engine: &'e E,
    options: SweepOptions,
}

impl<'e, E: WakeEngine + ?Sized> SensitivitySweepDriver<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self::with_options(engine, SweepOptions::default())
    }

    pub fn with_options(engine: &'e E, options: SweepOptions) -> Self {
        Self { engine, options }
    }

    /// Simulate every TI value at a fixed speed and direction.
    ///
    /// Always returns one sample per input value, in input order.
    pub fn sweep(
        &self,
        grid: &WindResourceGrid,
        layout: &Layout,
        turbulence_values: &[f64],
        speed: f64,
        direction_deg: f64,
    ) -> Vec<SensitivitySample> {
        let run = |&ti: &f64| self.sample(grid, layout, ti, speed, direction_deg);
        let samples: Vec<SensitivitySample> = if self.options.parallel {
            turbulence_values.par_iter().map(run).collect()
        } else {
            turbulence_values.iter().map(run).collect()
        };

        let failed = samples.iter().filter(|s| s.is_failed()).count();
        info!(
            samples = samples.len(),
            failed,
            parallel = self.options.parallel,
            "sensitivity sweep finished"
        );
        samples
    }

    fn sample(
        &self,
        grid: &WindResourceGrid,
        layout: &Layout,
        ti: f64,
        speed: f64,
        direction_deg: f64,
    ) -> SensitivitySample {
        let request = SimulationRequest::point(grid, layout, speed, direction_deg, ti);
        let output = match self.engine.simulate(&request) {
            Ok(output) => output,
            Err(err) => {
                warn!(ti, %err, "sweep sample failed");
                return SensitivitySample::failed(ti, err.to_string());
            }
        };

        let result = normalize(output.power.as_ref(), layout.len());
        if !result.status.is_usable() {
            warn!(ti, "sweep sample produced no usable power");
            return SensitivitySample::failed(ti, "engine output could not be normalized".into());
        }

        debug!(ti, total_power_kw = result.total_power, "sweep sample");
        SensitivitySample {
            turbulence_intensity: ti,
            total_power_kw: result.total_power,
            status: result.status,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use wf_engine::{EngineError, EngineOutput, EngineResult, RawPowerTensor, TurbulenceSpec};
    use wf_resource::{ResourceGridBuilder, axis};

    /// `1000 * ti` kW per turbine; errors on `fail_on`, one turbine too
    /// many on `wrong_shape_on`.
    struct Scripted {
        fail_on: Vec<f64>,
        wrong_shape_on: Vec<f64>,
    }

    impl WakeEngine for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn simulate(&self, request: &SimulationRequest<'_>) -> EngineResult<EngineOutput> {
            let TurbulenceSpec::Scalar(ti) = request.turbulence else {
                return Err(EngineError::InvalidRequest {
                    what: "scripted engine needs a TI override",
                });
            };
            if self.fail_on.contains(&ti) {
                return Err(EngineError::Backend {
                    message: format!("scripted failure at {ti}"),
                });
            }
            let n = if self.wrong_shape_on.contains(&ti) {
                request.turbine_count() + 1
            } else {
                request.turbine_count()
            };
            Ok(EngineOutput {
                power: Some(RawPowerTensor::Turbine(Array1::from_elem(n, 1000.0 * ti))),
                aep_gwh: None,
            })
        }
    }

    fn fixture() -> (WindResourceGrid, Layout) {
        let grid = ResourceGridBuilder::default()
            .build(&axis(0.0, 360.0, 90.0).unwrap(), &[8.0, 12.0])
            .unwrap();
        (grid, Layout::row(2, 400.0).unwrap())
    }

    #[test]
    fn failures_become_zero_samples_in_place() {
        let (grid, layout) = fixture();
        let engine = Scripted {
            fail_on: vec![0.10],
            wrong_shape_on: vec![0.12],
        };
        let samples = SensitivitySweepDriver::new(&engine).sweep(
            &grid,
            &layout,
            &[0.06, 0.10, 0.12],
            12.0,
            270.0,
        );

        let ti: Vec<f64> = samples.iter().map(|s| s.turbulence_intensity).collect();
        assert_eq!(ti, vec![0.06, 0.10, 0.12]);
        assert!((samples[0].total_power_kw - 120.0).abs() < 1e-9);
        assert_eq!(samples[1].total_power_kw, 0.0);
        assert_eq!(samples[2].total_power_kw, 0.0);
        assert_eq!(samples[0].status, ResultStatus::Ok);
        assert!(samples[1].message.as_deref().unwrap().contains("scripted failure"));
        assert!(samples[2].is_failed());
    }

    #[test]
    fn empty_input_gives_empty_sweep() {
        let (grid, layout) = fixture();
        let engine = Scripted {
            fail_on: vec![],
            wrong_shape_on: vec![],
        };
        let samples = SensitivitySweepDriver::new(&engine).sweep(&grid, &layout, &[], 12.0, 270.0);
        assert!(samples.is_empty());
    }
}
