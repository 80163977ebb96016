//! wf-core: stable foundation for windfarm.
//!
//! Contains:
//! - units (uom SI types + constructors, energy conversions)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact turbine identifiers)
//! - error (shared configuration error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{WfError, WfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
