//! wf-results: canonical per-turbine results and energy integration.
//!
//! Nothing in this crate returns an error. Every anomaly in engine output
//! (missing tensor, wrong turbine count, absent cells, grid mismatch) is
//! reported through `ResultStatus` instead.

pub mod aep;
pub mod normalize;

pub use aep::{
    AepEstimate, AepSource, gross_aep, integrate, integrate_cells, integrate_per_turbine,
};
pub use normalize::{NormalizedResult, ResultStatus, normalize, normalize_dyn};
