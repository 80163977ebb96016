/// Stage of a single-shot analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    BuildingGrid,
    BuildingLayout,
    Simulating,
    IntegratingAep,
    ComputingMetrics,
    Sweeping,
    Completed,
}

impl AnalysisStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::BuildingGrid => "Building resource grid",
            Self::BuildingLayout => "Building layout",
            Self::Simulating => "Simulating operating points",
            Self::IntegratingAep => "Integrating AEP",
            Self::ComputingMetrics => "Computing farm metrics",
            Self::Sweeping => "Running sensitivity sweep",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisProgressEvent {
    pub stage: AnalysisStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl AnalysisProgressEvent {
    pub fn stage(stage: AnalysisStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }
}
