//! wf-resource: directional wind-resource model for windfarm.
//!
//! Provides:
//! - Weibull speed distribution per direction sector
//! - `WindResourceGrid`, the immutable direction x speed resource description
//! - `ResourceGridBuilder`, which derives the grid from a `ResourceProfile`
//!
//! # Example
//!
//! ```
//! use wf_resource::{ResourceGridBuilder, axis};
//!
//! let directions = axis(0.0, 360.0, 10.0).unwrap();
//! let speeds = axis(3.0, 25.0, 1.0).unwrap();
//! let grid = ResourceGridBuilder::default().build(&directions, &speeds).unwrap();
//! assert_eq!(grid.cell_count(), 36 * 22);
//! ```

pub mod builder;
pub mod error;
pub mod grid;
pub mod weibull;

pub use builder::{ResourceGridBuilder, ResourceProfile, axis, sector_frequencies};
pub use error::{ConfigurationError, ResourceResult};
pub use grid::{GridSummary, SectorRow, Turbulence, WindResourceGrid, bin_widths};
pub use weibull::Weibull;
