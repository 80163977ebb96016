use crate::run_worker::{RunWorker, WorkerMessage};
use crate::surface::{EguiSurface, show_panel};
use std::path::PathBuf;
use wf_app::{AnalysisConfig, AnalysisProgressEvent, AnalysisReport, LayoutConfig, PanelKind};

pub struct WindFarmApp {
    config: AnalysisConfig,
    config_path: String,
    active_view: ViewTab,
    run_worker: Option<RunWorker>,
    latest_progress: Option<AnalysisProgressEvent>,
    last_worker_message: Option<String>,
    analysis: Option<AnalysisReport>,
    surface: EguiSurface,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewTab {
    Park,
    Simulation,
    Results,
    Configuration,
}

impl WindFarmApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            config: AnalysisConfig::default(),
            config_path: "windfarm.yaml".to_string(),
            active_view: ViewTab::Park,
            run_worker: None,
            latest_progress: None,
            last_worker_message: None,
            analysis: None,
            surface: EguiSurface::default(),
        }
    }

    fn poll_worker(&mut self) {
        let mut finished = None;

        if let Some(worker) = &self.run_worker {
            while let Ok(msg) = worker.progress_rx.try_recv() {
                match msg {
                    WorkerMessage::Progress(event) => {
                        self.last_worker_message = event.message.clone();
                        self.latest_progress = Some(event);
                    }
                    WorkerMessage::Complete(analysis) => {
                        finished = Some(Ok(analysis));
                        break;
                    }
                    WorkerMessage::Error { message } => {
                        finished = Some(Err(message));
                        break;
                    }
                }
            }
        }

        match finished {
            Some(Ok(analysis)) => {
                self.run_worker = None;
                self.latest_progress = None;
                let report = analysis.render(&mut self.surface);
                let failed = report.diagnostics().count();
                self.last_worker_message = Some(format!(
                    "Analysis completed in {:.2}s{}",
                    analysis.elapsed_wall_s,
                    if failed > 0 {
                        format!(" ({} panel(s) unavailable)", failed)
                    } else {
                        String::new()
                    }
                ));
                self.analysis = Some(*analysis);
                self.active_view = ViewTab::Results;
            }
            Some(Err(message)) => {
                self.run_worker = None;
                self.latest_progress = None;
                self.last_worker_message = Some(message);
            }
            None => {}
        }
    }

    fn start_run(&mut self, ctx: &egui::Context) {
        if self.run_worker.is_some() {
            return;
        }
        if let Err(e) = wf_app::validate_config(&self.config) {
            self.last_worker_message = Some(format!("Invalid configuration: {}", e));
            return;
        }
        self.latest_progress = None;
        self.last_worker_message = Some("Analysis started".to_string());
        self.run_worker = Some(RunWorker::start(self.config.clone(), ctx.clone()));
    }

    fn load_config(&mut self) {
        match wf_app::load_config(&PathBuf::from(&self.config_path)) {
            Ok(config) => {
                self.config = config;
                self.last_worker_message = Some(format!("Loaded {}", self.config_path));
            }
            Err(e) => {
                self.last_worker_message = Some(format!("Failed to load configuration: {}", e));
            }
        }
    }

    fn save_config(&mut self) {
        match wf_app::save_yaml(&PathBuf::from(&self.config_path), &self.config) {
            Ok(()) => self.last_worker_message = Some(format!("Saved {}", self.config_path)),
            Err(e) => {
                self.last_worker_message = Some(format!("Failed to save configuration: {}", e));
            }
        }
    }

    fn report_panel(&self, ui: &mut egui::Ui, kind: PanelKind, height: f32) {
        match self.surface.panels().iter().find(|p| p.kind == kind) {
            Some(panel) => show_panel(ui, panel, height),
            None => {
                ui.label("Run an analysis to see this panel");
            }
        }
    }

    fn show_park(&mut self, ui: &mut egui::Ui) {
        ui.heading("Park");
        ui.separator();

        let mut is_row = matches!(self.config.layout, LayoutConfig::Row { .. });
        ui.horizontal(|ui| {
            ui.label("Layout:");
            if ui.radio_value(&mut is_row, true, "Row").changed() {
                self.config.layout = LayoutConfig::default();
            }
            if ui.radio_value(&mut is_row, false, "Explicit").changed() {
                let layout = self.config.layout.build().ok();
                self.config.layout = LayoutConfig::Explicit {
                    x: layout.as_ref().map(|l| l.x()).unwrap_or_default(),
                    y: layout.as_ref().map(|l| l.y()).unwrap_or_default(),
                };
            }
        });

        match &mut self.config.layout {
            LayoutConfig::Row {
                turbine_count,
                spacing_m,
            } => {
                ui.horizontal(|ui| {
                    ui.label("Turbines:");
                    ui.add(egui::DragValue::new(turbine_count).range(1..=50));
                    ui.label("Spacing:");
                    ui.add(
                        egui::DragValue::new(spacing_m)
                            .speed(10.0)
                            .range(50.0..=5000.0)
                            .suffix(" m"),
                    );
                });
            }
            LayoutConfig::Explicit { x, y } => {
                let mut remove = None;
                egui::Grid::new("explicit_layout").striped(true).show(ui, |ui| {
                    ui.strong("Turbine");
                    ui.strong("x (m)");
                    ui.strong("y (m)");
                    ui.end_row();
                    for (i, (xi, yi)) in x.iter_mut().zip(y.iter_mut()).enumerate() {
                        ui.label(format!("T{}", i + 1));
                        ui.add(egui::DragValue::new(xi).speed(10.0));
                        ui.add(egui::DragValue::new(yi).speed(10.0));
                        if ui.small_button("✕").clicked() {
                            remove = Some(i);
                        }
                        ui.end_row();
                    }
                });
                if let Some(i) = remove {
                    x.remove(i);
                    y.remove(i);
                }
                if ui.button("+ Turbine").clicked() {
                    let next_x = x.iter().copied().fold(0.0_f64, f64::max) + 400.0;
                    x.push(if x.is_empty() { 0.0 } else { next_x });
                    y.push(0.0);
                }
            }
        }

        if let Err(e) = self.config.layout.build() {
            ui.colored_label(egui::Color32::RED, e.to_string());
        }

        ui.separator();
        self.report_panel(ui, PanelKind::Layout, 360.0);
    }

    fn show_simulation(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Simulation");
        ui.separator();

        let site = &mut self.config.site;
        egui::Grid::new("site_settings").show(ui, |ui| {
            ui.label("Direction step");
            ui.add(
                egui::DragValue::new(&mut site.direction_step_deg)
                    .range(1.0..=90.0)
                    .suffix(" deg"),
            );
            ui.end_row();
            ui.label("Speed range");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut site.speed_min).range(0.5..=30.0));
                ui.label("to");
                ui.add(egui::DragValue::new(&mut site.speed_max).range(1.0..=40.0));
                ui.label("step");
                ui.add(
                    egui::DragValue::new(&mut site.speed_step)
                        .speed(0.1)
                        .range(0.1..=5.0)
                        .suffix(" m/s"),
                );
            });
            ui.end_row();
            ui.label("Prevailing direction");
            ui.add(
                egui::DragValue::new(&mut site.profile.prevailing_direction_deg)
                    .range(0.0..=359.0)
                    .suffix(" deg"),
            );
            ui.end_row();
            ui.label("Ambient turbulence");
            ui.add(
                egui::DragValue::new(&mut site.profile.turbulence_intensity)
                    .speed(0.005)
                    .range(0.01..=0.5),
            );
            ui.end_row();
            ui.label("Operating-point TI");
            ui.add(
                egui::DragValue::new(&mut self.config.simulation.turbulence)
                    .speed(0.005)
                    .range(0.01..=0.5),
            );
            ui.end_row();
        });

        ui.separator();
        ui.checkbox(&mut self.config.sweep.enabled, "Turbulence sensitivity sweep");
        ui.add_enabled_ui(self.config.sweep.enabled, |ui| {
            ui.horizontal(|ui| {
                ui.label("Speed");
                ui.add(egui::DragValue::new(&mut self.config.sweep.speed).range(1.0..=30.0));
                ui.label("Direction");
                ui.add(
                    egui::DragValue::new(&mut self.config.sweep.direction_deg).range(0.0..=359.0),
                );
                ui.checkbox(&mut self.config.sweep.parallel, "Parallel");
            });
            ui.label(format!(
                "TI values: {}",
                self.config
                    .sweep
                    .turbulence_values
                    .iter()
                    .map(|v| format!("{:.2}", v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        });

        ui.separator();
        ui.add_enabled_ui(self.run_worker.is_none(), |ui| {
            if ui.button("Run analysis").clicked() {
                self.start_run(ctx);
            }
        });
        if let Some(progress) = &self.latest_progress {
            ui.label(format!("Stage: {}", progress.stage.label()));
            ui.label(format!("Elapsed: {:.2}s", progress.elapsed_wall_s));
            ui.add(
                egui::ProgressBar::new(0.0)
                    .animate(true)
                    .text(progress.stage.label()),
            );
        }
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        ui.heading("Results");
        ui.separator();

        let Some(analysis) = &self.analysis else {
            ui.label("No analysis yet. Configure the park and run one from Simulation.");
            return;
        };

        ui.horizontal(|ui| {
            match analysis.aep.aep_gwh {
                Some(v) => ui.strong(format!("AEP {:.2} GWh ({})", v, analysis.aep.status)),
                None => ui.strong("AEP unavailable"),
            };
            if let Some(loss) = analysis.metrics.wake_loss_pct {
                ui.label(format!("Wake loss {:.1} %", loss));
            }
            if let Some(cf) = analysis.metrics.capacity_factor {
                ui.label(format!("Capacity factor {:.1} %", cf * 100.0));
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |cols| {
                self.report_panel(&mut cols[0], PanelKind::TurbinePower, 260.0);
                self.report_panel(&mut cols[1], PanelKind::DirectionalFrequency, 260.0);
            });
            ui.separator();
            self.report_panel(ui, PanelKind::Sensitivity, 260.0);
        });
    }

    fn show_configuration(&mut self, ui: &mut egui::Ui) {
        ui.heading("Configuration");
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("File:");
            ui.text_edit_singleline(&mut self.config_path);
            if ui.button("Load").clicked() {
                self.load_config();
            }
            if ui.button("Save").clicked() {
                self.save_config();
            }
            if ui.button("Reset").clicked() {
                self.config = AnalysisConfig::default();
            }
        });
        ui.separator();

        self.report_panel(ui, PanelKind::ConfigurationSummary, 0.0);
        ui.separator();

        ui.collapsing("YAML", |ui| match serde_yaml::to_string(&self.config) {
            Ok(text) => {
                ui.monospace(text);
            }
            Err(e) => {
                ui.colored_label(egui::Color32::RED, e.to_string());
            }
        });
    }
}

impl eframe::App for WindFarmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        egui::SidePanel::left("navigation")
            .default_width(180.0)
            .show(ctx, |ui| {
                ui.heading("WindFarm");
                ui.separator();
                ui.selectable_value(&mut self.active_view, ViewTab::Park, "Park");
                ui.selectable_value(&mut self.active_view, ViewTab::Simulation, "Simulation");
                ui.selectable_value(&mut self.active_view, ViewTab::Results, "Results");
                ui.selectable_value(
                    &mut self.active_view,
                    ViewTab::Configuration,
                    "Configuration",
                );

                ui.separator();
                if self.run_worker.is_some() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Running");
                    });
                }
                if let Some(message) = &self.last_worker_message {
                    ui.label(message);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.active_view {
            ViewTab::Park => self.show_park(ui),
            ViewTab::Simulation => self.show_simulation(ui, ctx),
            ViewTab::Results => self.show_results(ui),
            ViewTab::Configuration => self.show_configuration(ui),
        });
    }
}
