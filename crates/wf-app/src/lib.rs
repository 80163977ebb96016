//! Shared application service layer for windfarm.
//!
//! Both the CLI and the GUI go through this crate: configuration loading,
//! the single-shot analysis, the turbulence sensitivity sweep, farm metrics
//! and report orchestration.

pub mod analysis;
pub mod config;
pub mod error;
pub mod metrics;
pub mod progress;
pub mod report;
pub mod sweep;

// Re-export key types for convenience
pub use analysis::{
    AnalysisReport, AnalysisSummary, reference_engine, run_analysis, run_analysis_with_engine,
    run_analysis_with_progress,
};
pub use config::{
    AnalysisConfig, LayoutConfig, SimulationConfig, SiteConfig, SweepConfig, load_config,
    load_json, load_yaml, save_yaml, validate_config,
};
pub use error::{AppError, AppResult};
pub use metrics::{FarmMetrics, compute_farm_metrics, turbine_efficiency};
pub use progress::{AnalysisProgressEvent, AnalysisStage};
pub use report::{
    NullSurface, Panel, PanelContent, PanelKind, RenderError, RenderSurface, Report,
    ReportContext, ReportInputs, build_report,
};
pub use sweep::{SensitivitySample, SensitivitySweepDriver, SweepOptions};
