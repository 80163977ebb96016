//! wf-engine: wake-engine boundary for windfarm.
//!
//! Provides:
//! - `Layout` (turbine positions) and `SimulationRequest`
//! - `RawPowerTensor`, the rank-ambiguous engine output as a tagged variant
//! - `WakeEngine` and `TurbineModel` traits
//! - a reference Gaussian wake engine and a tabular reference turbine
//!
//! # Architecture
//!
//! The rest of windfarm talks to wake physics only through `WakeEngine`.
//! The output rank follows the request: every direction or speed selection
//! given as a scalar collapses its axis, so a request can produce
//! `[turbine]`, `[turbine, direction|speed]` or `[turbine, direction, speed]`.
//!
//! # Example
//!
//! ```
//! use wf_engine::{GaussianWakeEngine, Layout, SimulationRequest, TabularTurbine, WakeEngine};
//! use wf_resource::{ResourceGridBuilder, axis};
//!
//! let grid = ResourceGridBuilder::default()
//!     .build(&axis(0.0, 360.0, 10.0).unwrap(), &axis(3.0, 25.0, 1.0).unwrap())
//!     .unwrap();
//! let layout = Layout::row(3, 400.0).unwrap();
//! let engine = GaussianWakeEngine::new(TabularTurbine::v80());
//!
//! let request = SimulationRequest::point(&grid, &layout, 12.0, 270.0, 0.08);
//! let output = engine.simulate(&request).unwrap();
//! assert_eq!(output.power.unwrap().rank(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod gaussian;
pub mod layout;
pub mod request;
pub mod tensor;
pub mod turbine;

pub use engine::{EngineOutput, WakeEngine};
pub use error::{EngineError, EngineResult};
pub use gaussian::{GaussianConfig, GaussianWakeEngine};
pub use layout::Layout;
pub use request::{AxisSelection, SimulationRequest, TurbulenceSpec};
pub use tensor::{RawPowerTensor, VaryingAxis, farm_power_by_cell, is_usable_power};
pub use turbine::{TabularTurbine, TurbineModel};
