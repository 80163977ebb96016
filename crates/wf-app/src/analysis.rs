//! Single-shot analysis service shared by CLI and GUI.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use wf_engine::{
    EngineOutput, GaussianWakeEngine, Layout, SimulationRequest, TabularTurbine, TurbineModel,
    TurbulenceSpec, WakeEngine,
};
use wf_resource::{GridSummary, SectorRow, WindResourceGrid};
use wf_results::{
    AepEstimate, NormalizedResult, gross_aep, integrate, integrate_per_turbine, normalize,
};

use crate::config::AnalysisConfig;
use crate::error::AppResult;
use crate::metrics::{FarmMetrics, compute_farm_metrics};
use crate::progress::{AnalysisProgressEvent, AnalysisStage};
use crate::report::{RenderSurface, Report, ReportInputs, build_report};
use crate::sweep::{SensitivitySample, SensitivitySweepDriver};

/// Everything one analysis produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub engine_name: String,
    pub grid: WindResourceGrid,
    pub layout: Layout,
    /// Per-turbine power over the configured operating points, AEP attached
    pub result: NormalizedResult,
    pub aep: AepEstimate,
    pub metrics: FarmMetrics,
    /// Empty when the sweep is disabled
    pub sweep: Vec<SensitivitySample>,
    pub elapsed_wall_s: f64,
}

/// Serializable view of an `AnalysisReport` for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary<'a> {
    pub engine: &'a str,
    pub grid: GridSummary,
    pub sectors: Vec<SectorRow>,
    pub layout_x: Vec<f64>,
    pub layout_y: Vec<f64>,
    pub result: &'a NormalizedResult,
    pub aep: &'a AepEstimate,
    pub metrics: &'a FarmMetrics,
    pub sweep: &'a [SensitivitySample],
    pub elapsed_wall_s: f64,
}

impl AnalysisReport {
    pub fn report_inputs(&self) -> ReportInputs<'_> {
        ReportInputs {
            engine_name: &self.engine_name,
            grid: &self.grid,
            layout: &self.layout,
            result: &self.result,
            aep: &self.aep,
            metrics: Some(&self.metrics),
            sweep: &self.sweep,
        }
    }

    /// Build the panel report on a frontend surface.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> Report {
        build_report(&self.report_inputs(), surface)
    }

    pub fn summary(&self) -> AnalysisSummary<'_> {
        AnalysisSummary {
            engine: &self.engine_name,
            grid: self.grid.summary(),
            sectors: self.grid.sector_table(),
            layout_x: self.layout.x(),
            layout_y: self.layout.y(),
            result: &self.result,
            aep: &self.aep,
            metrics: &self.metrics,
            sweep: &self.sweep,
            elapsed_wall_s: self.elapsed_wall_s,
        }
    }
}

/// Reference engine described by a configuration.
pub fn reference_engine(config: &AnalysisConfig) -> GaussianWakeEngine<TabularTurbine> {
    GaussianWakeEngine::with_config(TabularTurbine::v80(), config.wake_model)
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(AnalysisProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback<'_>,
    stage: AnalysisStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(AnalysisProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

/// Run an analysis with the reference engine.
pub fn run_analysis(config: &AnalysisConfig) -> AppResult<AnalysisReport> {
    run_analysis_with_progress(config, None)
}

/// Run an analysis with the reference engine, streaming progress events.
pub fn run_analysis_with_progress(
    config: &AnalysisConfig,
    progress_cb: ProgressCallback<'_>,
) -> AppResult<AnalysisReport> {
    let engine = reference_engine(config);
    run_analysis_with_engine(config, &engine, engine.turbine(), progress_cb)
}

/// Run an analysis through any engine.
///
/// Only grid and layout construction can fail. Engine failures degrade the
/// affected result to `Unavailable` and the analysis carries on.
pub fn run_analysis_with_engine<E, T>(
    config: &AnalysisConfig,
    engine: &E,
    turbine: &T,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<AnalysisReport>
where
    E: WakeEngine + ?Sized,
    T: TurbineModel + ?Sized,
{
    let started = Instant::now();

    emit_progress(&mut progress_cb, AnalysisStage::BuildingGrid, started, None);
    let grid = config.site.build_grid()?;

    emit_progress(&mut progress_cb, AnalysisStage::BuildingLayout, started, None);
    let layout = config.layout.build()?;

    emit_progress(
        &mut progress_cb,
        AnalysisStage::Simulating,
        started,
        Some(format!(
            "{} directions x {} speeds",
            config.simulation.directions.len(),
            config.simulation.speeds.len()
        )),
    );
    let request = SimulationRequest::subset(
        &grid,
        &layout,
        config.simulation.directions.clone(),
        config.simulation.speeds.clone(),
        TurbulenceSpec::Scalar(config.simulation.turbulence),
    );
    let result = match engine.simulate(&request) {
        Ok(output) => normalize(output.power.as_ref(), layout.len()),
        Err(err) => {
            warn!(%err, "operating-point simulation failed");
            NormalizedResult::unavailable(layout.len())
        }
    };

    emit_progress(&mut progress_cb, AnalysisStage::IntegratingAep, started, None);
    let full = match engine.simulate(&SimulationRequest::full_grid(&grid, &layout)) {
        Ok(output) => output,
        Err(err) => {
            warn!(%err, "full-grid simulation failed");
            EngineOutput::default()
        }
    };
    let aep = integrate(&grid, &full);
    let result = result.with_aep(aep.aep_gwh);

    emit_progress(&mut progress_cb, AnalysisStage::ComputingMetrics, started, None);
    let turbine_aep = full
        .power
        .as_ref()
        .and_then(|tensor| integrate_per_turbine(&grid, tensor));
    let gross = gross_aep(&grid, turbine, layout.len());
    let metrics = compute_farm_metrics(
        &aep,
        gross,
        &result,
        turbine.rated_power_kw(),
        turbine_aep,
    );

    let sweep = if config.sweep.enabled {
        emit_progress(
            &mut progress_cb,
            AnalysisStage::Sweeping,
            started,
            Some(format!(
                "{} turbulence values",
                config.sweep.turbulence_values.len()
            )),
        );
        SensitivitySweepDriver::with_options(engine, config.sweep.options()).sweep(
            &grid,
            &layout,
            &config.sweep.turbulence_values,
            config.sweep.speed,
            config.sweep.direction_deg,
        )
    } else {
        Vec::new()
    };

    let elapsed_wall_s = started.elapsed().as_secs_f64();
    info!(
        turbines = layout.len(),
        total_power_kw = result.total_power,
        aep_gwh = ?aep.aep_gwh,
        aep_status = %aep.status,
        elapsed_wall_s,
        "analysis completed"
    );
    emit_progress(
        &mut progress_cb,
        AnalysisStage::Completed,
        started,
        Some("Analysis completed".to_string()),
    );

    Ok(AnalysisReport {
        config: config.clone(),
        engine_name: engine.name().to_string(),
        grid,
        layout,
        result,
        aep,
        metrics,
        sweep,
        elapsed_wall_s,
    })
}
