//! Report orchestration: which panels to show and what data feeds them.
//!
//! Panels are pure data. Each frontend implements `RenderSurface` to turn
//! them into pixels or text. Two guarantees hold for every report:
//!
//! - panels are produced in `PanelKind::ORDER`, and a failure while
//!   preparing or drawing one panel only replaces that panel with a
//!   diagnostic
//! - the surface is acquired once per report and released on every exit
//!   path, including unwinding, through the `ReportContext` guard

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wf_engine::Layout;
use wf_resource::WindResourceGrid;
use wf_results::{AepEstimate, NormalizedResult};

use crate::metrics::FarmMetrics;
use crate::sweep::SensitivitySample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKind {
    Layout,
    TurbinePower,
    DirectionalFrequency,
    ConfigurationSummary,
    Sensitivity,
}

impl PanelKind {
    /// Declared panel order.
    pub const ORDER: [PanelKind; 5] = [
        PanelKind::Layout,
        PanelKind::TurbinePower,
        PanelKind::DirectionalFrequency,
        PanelKind::ConfigurationSummary,
        PanelKind::Sensitivity,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Layout => "Wind farm layout",
            Self::TurbinePower => "Mean power per turbine",
            Self::DirectionalFrequency => "Wind direction frequency",
            Self::ConfigurationSummary => "Configuration summary",
            Self::Sensitivity => "Sensitivity to turbulence intensity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelContent {
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<[f64; 2]>,
        labels: Vec<String>,
    },
    Bars {
        x_label: String,
        y_label: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Line {
        x_label: String,
        y_label: String,
        points: Vec<[f64; 2]>,
        /// Indices of points that stand for failed computations
        failed: Vec<usize>,
    },
    Text {
        rows: Vec<(String, String)>,
    },
    /// Shown in place of a panel whose data could not be prepared or drawn.
    Diagnostic {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: String,
    pub content: PanelContent,
}

impl Panel {
    fn new(kind: PanelKind, content: PanelContent) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            content,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self.content, PanelContent::Diagnostic { .. })
    }
}

/// Failure to prepare or draw one panel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("{0}")]
    MissingData(String),

    #[error("surface error: {0}")]
    Surface(String),
}

/// A frontend's drawing target.
pub trait RenderSurface {
    /// Start a new report. Called once per `ReportContext`.
    fn acquire(&mut self);

    /// Draw one panel.
    fn draw(&mut self, panel: &Panel) -> Result<(), RenderError>;

    /// Clear any per-report state. Called exactly once after `acquire`.
    fn release(&mut self);
}

/// Holds a surface for the duration of one report.
pub struct ReportContext<'s, S: RenderSurface + ?Sized> {
    surface: &'s mut S,
}

impl<'s, S: RenderSurface + ?Sized> ReportContext<'s, S> {
    pub fn new(surface: &'s mut S) -> Self {
        surface.acquire();
        Self { surface }
    }

    pub fn draw(&mut self, panel: &Panel) -> Result<(), RenderError> {
        self.surface.draw(panel)
    }
}

impl<S: RenderSurface + ?Sized> Drop for ReportContext<'_, S> {
    fn drop(&mut self) {
        self.surface.release();
    }
}

/// Surface that draws nothing; for callers that only want panel data.
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn acquire(&mut self) {}

    fn draw(&mut self, _panel: &Panel) -> Result<(), RenderError> {
        Ok(())
    }

    fn release(&mut self) {}
}

/// Everything a report can draw from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub engine_name: &'a str,
    pub grid: &'a WindResourceGrid,
    pub layout: &'a Layout,
    pub result: &'a NormalizedResult,
    pub aep: &'a AepEstimate,
    pub metrics: Option<&'a FarmMetrics>,
    pub sweep: &'a [SensitivitySample],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: String,
    pub panels: Vec<Panel>,
}

impl Report {
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(|p| p.is_diagnostic())
    }
}

type PanelData = Result<PanelContent, RenderError>;

fn turbine_labels(layout: &Layout) -> Vec<String> {
    layout.ids().map(|id| id.label()).collect()
}

fn layout_panel(inputs: &ReportInputs<'_>) -> PanelData {
    let points = inputs
        .layout
        .positions()
        .iter()
        .map(|p| [p.x, p.y])
        .collect();
    Ok(PanelContent::Scatter {
        x_label: "x (m)".into(),
        y_label: "y (m)".into(),
        points,
        labels: turbine_labels(inputs.layout),
    })
}

fn turbine_power_panel(inputs: &ReportInputs<'_>) -> PanelData {
    let result = inputs.result;
    if !result.status.is_usable() {
        return Err(RenderError::MissingData(
            "per-turbine power unavailable".into(),
        ));
    }
    if result.turbine_count() != inputs.layout.len() {
        return Err(RenderError::MissingData(format!(
            "{} power values for {} turbines",
            result.turbine_count(),
            inputs.layout.len()
        )));
    }
    Ok(PanelContent::Bars {
        x_label: "Turbine".into(),
        y_label: "Mean power (kW)".into(),
        labels: turbine_labels(inputs.layout),
        values: result.per_turbine_power.clone(),
    })
}

fn frequency_panel(inputs: &ReportInputs<'_>) -> PanelData {
    let rows = inputs.grid.sector_table();
    Ok(PanelContent::Bars {
        x_label: "Direction (deg)".into(),
        y_label: "Frequency (%)".into(),
        labels: rows
            .iter()
            .map(|r| format!("{:.0}", r.direction_deg))
            .collect(),
        values: rows.iter().map(|r| 100.0 * r.frequency).collect(),
    })
}

fn fmt_gwh(v: Option<f64>) -> String {
    v.map_or_else(|| "unavailable".to_string(), |v| format!("{v:.3} GWh"))
}

fn configuration_panel(inputs: &ReportInputs<'_>) -> PanelData {
    let summary = inputs.grid.summary();
    let mut rows = vec![
        ("Wake engine".to_string(), inputs.engine_name.to_string()),
        ("Turbines".to_string(), inputs.layout.len().to_string()),
        (
            "Grid".to_string(),
            format!(
                "{} directions x {} speeds",
                summary.direction_count, summary.speed_count
            ),
        ),
        (
            "Mean Weibull A".to_string(),
            format!("{:.2} m/s", summary.mean_weibull_a),
        ),
        (
            "Mean Weibull k".to_string(),
            format!("{:.3}", summary.mean_weibull_k),
        ),
        (
            "Mean turbulence intensity".to_string(),
            format!("{:.3}", summary.mean_turbulence),
        ),
        (
            "Total power".to_string(),
            format!(
                "{:.1} kW ({})",
                inputs.result.total_power, inputs.result.status
            ),
        ),
        (
            "AEP".to_string(),
            format!("{} ({})", fmt_gwh(inputs.aep.aep_gwh), inputs.aep.status),
        ),
    ];
    if let Some(spacing) = inputs.layout.min_spacing() {
        rows.push(("Minimum spacing".to_string(), format!("{spacing:.0} m")));
    }
    if let Some(m) = inputs.metrics {
        rows.push(("Gross AEP".to_string(), fmt_gwh(Some(m.gross_aep_gwh))));
        if let Some(loss) = m.wake_loss_pct {
            rows.push(("Wake loss".to_string(), format!("{loss:.2} %")));
        }
        if let Some(cf) = m.capacity_factor {
            rows.push(("Capacity factor".to_string(), format!("{:.1} %", 100.0 * cf)));
        }
    }
    Ok(PanelContent::Text { rows })
}

fn sensitivity_panel(inputs: &ReportInputs<'_>) -> PanelData {
    if inputs.sweep.is_empty() {
        return Err(RenderError::MissingData(
            "sensitivity sweep not run".into(),
        ));
    }
    Ok(PanelContent::Line {
        x_label: "Turbulence intensity".into(),
        y_label: "Total power (kW)".into(),
        points: inputs
            .sweep
            .iter()
            .map(|s| [s.turbulence_intensity, s.total_power_kw])
            .collect(),
        failed: inputs
            .sweep
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_failed())
            .map(|(i, _)| i)
            .collect(),
    })
}

fn prepare(kind: PanelKind, inputs: &ReportInputs<'_>) -> PanelData {
    match kind {
        PanelKind::Layout => layout_panel(inputs),
        PanelKind::TurbinePower => turbine_power_panel(inputs),
        PanelKind::DirectionalFrequency => frequency_panel(inputs),
        PanelKind::ConfigurationSummary => configuration_panel(inputs),
        PanelKind::Sensitivity => sensitivity_panel(inputs),
    }
}

fn diagnostic(kind: PanelKind, err: &RenderError) -> Panel {
    Panel::new(
        kind,
        PanelContent::Diagnostic {
            message: err.to_string(),
        },
    )
}

/// Prepare every panel in declared order and draw it on `surface`.
pub fn build_report<S: RenderSurface + ?Sized>(
    inputs: &ReportInputs<'_>,
    surface: &mut S,
) -> Report {
    let mut ctx = ReportContext::new(surface);
    let mut panels = Vec::with_capacity(PanelKind::ORDER.len());

    for kind in PanelKind::ORDER {
        let mut panel = match prepare(kind, inputs) {
            Ok(content) => Panel::new(kind, content),
            Err(err) => {
                warn!(panel = ?kind, %err, "panel data unavailable");
                diagnostic(kind, &err)
            }
        };

        if let Err(err) = ctx.draw(&panel) {
            warn!(panel = ?kind, %err, "panel failed to draw");
            panel = diagnostic(kind, &err);
            if let Err(err) = ctx.draw(&panel) {
                warn!(panel = ?kind, %err, "diagnostic failed to draw");
            }
        }
        panels.push(panel);
    }

    debug!(
        panels = panels.len(),
        diagnostics = panels.iter().filter(|p| p.is_diagnostic()).count(),
        "report built"
    );

    Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        acquired: usize,
        released: usize,
        drawn: Vec<PanelKind>,
        fail_on: Option<PanelKind>,
    }

    impl RenderSurface for Recording {
        fn acquire(&mut self) {
            self.acquired += 1;
        }

        fn draw(&mut self, panel: &Panel) -> Result<(), RenderError> {
            if Some(panel.kind) == self.fail_on && !panel.is_diagnostic() {
                return Err(RenderError::Surface("backend refused".into()));
            }
            self.drawn.push(panel.kind);
            Ok(())
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    #[test]
    fn context_releases_on_drop() {
        let mut surface = Recording::default();
        {
            let _ctx = ReportContext::new(&mut surface);
        }
        assert_eq!((surface.acquired, surface.released), (1, 1));
    }

    #[test]
    fn context_releases_on_unwind() {
        let mut surface = Recording::default();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ctx = ReportContext::new(&mut surface);
            panic!("drawing backend crashed");
        }));
        assert!(outcome.is_err());
        assert_eq!(surface.released, 1);
    }

    #[test]
    fn order_is_declared_once() {
        let mut seen = PanelKind::ORDER.to_vec();
        seen.dedup();
        assert_eq!(seen.len(), 5);
        assert_eq!(PanelKind::ORDER[0], PanelKind::Layout);
        assert_eq!(PanelKind::ORDER[3], PanelKind::ConfigurationSummary);
    }

    #[test]
    fn failed_draw_falls_back_to_diagnostic() {
        let mut surface = Recording {
            fail_on: Some(PanelKind::DirectionalFrequency),
            ..Default::default()
        };
        let panel = Panel::new(
            PanelKind::DirectionalFrequency,
            PanelContent::Text { rows: vec![] },
        );
        {
            let mut ctx = ReportContext::new(&mut surface);
            assert!(ctx.draw(&panel).is_err());
            let fallback = diagnostic(panel.kind, &RenderError::Surface("x".into()));
            assert!(ctx.draw(&fallback).is_ok());
        }
        assert_eq!(surface.drawn, vec![PanelKind::DirectionalFrequency]);
        assert_eq!(surface.released, 1);
    }
}
