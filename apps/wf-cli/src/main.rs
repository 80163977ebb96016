use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wf_app::{
    AnalysisConfig, AnalysisProgressEvent, AnalysisSummary, AppResult, LayoutConfig, NullSurface,
    Panel, PanelContent, RenderError, RenderSurface, Report, SensitivitySample,
    SensitivitySweepDriver, SweepOptions, load_config, reference_engine, run_analysis_with_progress,
    save_yaml,
};
use wf_engine::WakeEngine;

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(about = "WindFarm CLI - offshore wind farm AEP and wake-loss analysis", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report
    Analyze {
        /// Configuration file (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of turbines in a west-east row
        #[arg(long)]
        turbines: Option<usize>,
        /// Row spacing in meters
        #[arg(long)]
        spacing: Option<f64>,
        /// Skip the turbulence sensitivity sweep
        #[arg(long)]
        no_sweep: bool,
        /// Print the analysis and report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the wind rose: Weibull parameters and frequency per sector
    Grid {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a turbulence sensitivity sweep at one operating point
    Sweep {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated turbulence intensities, e.g. 0.06,0.08,0.10
        #[arg(long, value_delimiter = ',', required = true)]
        ti: Vec<f64>,
        /// Free-stream wind speed (m/s)
        #[arg(long)]
        speed: Option<f64>,
        /// Wind direction (deg, meteorological)
        #[arg(long)]
        direction: Option<f64>,
        /// Run samples in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Write the default configuration as YAML
    InitConfig {
        /// Output file path
        path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            config,
            turbines,
            spacing,
            no_sweep,
            json,
        } => cmd_analyze(config.as_deref(), turbines, spacing, no_sweep, json),
        Commands::Grid { config } => cmd_grid(config.as_deref()),
        Commands::Sweep {
            config,
            ti,
            speed,
            direction,
            parallel,
        } => cmd_sweep(config.as_deref(), &ti, speed, direction, parallel),
        Commands::InitConfig { path } => cmd_init_config(&path),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_or_default(path: Option<&Path>) -> AppResult<AnalysisConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// `--turbines` / `--spacing` always describe a row; missing values come
/// from the configured row, or the default row for explicit layouts.
fn apply_layout_overrides(config: &mut AnalysisConfig, turbines: Option<usize>, spacing: Option<f64>) {
    if turbines.is_none() && spacing.is_none() {
        return;
    }
    let row = match &config.layout {
        row @ LayoutConfig::Row { .. } => row.clone(),
        LayoutConfig::Explicit { .. } => LayoutConfig::default(),
    };
    let LayoutConfig::Row {
        turbine_count: count,
        spacing_m,
    } = row
    else {
        return;
    };
    config.layout = LayoutConfig::Row {
        turbine_count: turbines.unwrap_or(count),
        spacing_m: spacing.unwrap_or(spacing_m),
    };
}

fn cmd_analyze(
    config_path: Option<&Path>,
    turbines: Option<usize>,
    spacing: Option<f64>,
    no_sweep: bool,
    json: bool,
) -> AppResult<()> {
    let mut config = load_or_default(config_path)?;
    apply_layout_overrides(&mut config, turbines, spacing);
    if no_sweep {
        config.sweep.enabled = false;
    }
    wf_app::validate_config(&config)?;

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let analysis = run_analysis_with_progress(
        &config,
        Some(&mut |event: AnalysisProgressEvent| {
            let emit_now = Some(event.stage) != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now && !json {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;

    if json {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            analysis: AnalysisSummary<'a>,
            report: Report,
        }
        let output = JsonOutput {
            analysis: analysis.summary(),
            report: analysis.render(&mut NullSurface),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    clear_progress_line();

    println!("✓ Analysis completed in {:.2}s", analysis.elapsed_wall_s);
    println!("  Engine: {}", analysis.engine_name);
    println!();

    let result = &analysis.result;
    println!("Per-turbine power ({})", result.status);
    for (id, power) in analysis.layout.ids().zip(&result.per_turbine_power) {
        println!("  {:<4} {:>10.1} kW", id.label(), power);
    }
    println!("  {:<4} {:>10.1} kW", "sum", result.total_power);
    println!();

    let aep = &analysis.aep;
    match aep.aep_gwh {
        Some(v) => println!("AEP: {:.3} GWh ({}, {:?})", v, aep.status, aep.source),
        None => println!("AEP: unavailable"),
    }
    let m = &analysis.metrics;
    println!("  Gross AEP:        {:.3} GWh", m.gross_aep_gwh);
    if let Some(loss) = m.wake_loss_pct {
        println!("  Wake loss:        {:.2} %", loss);
    }
    if let Some(cf) = m.capacity_factor {
        println!("  Capacity factor:  {:.1} %", cf * 100.0);
    }
    println!("  Installed:        {:.1} MW", m.installed_capacity_mw);
    println!();

    if !analysis.sweep.is_empty() {
        print_sweep_table(&analysis.sweep);
        println!();
    }

    let mut surface = TextSurface::new(io::stdout());
    let report = analysis.render(&mut surface);
    let diagnostics = report.diagnostics().count();
    if diagnostics > 0 {
        println!("{} panel(s) could not be drawn", diagnostics);
    }
    Ok(())
}

fn cmd_grid(config_path: Option<&Path>) -> AppResult<()> {
    let config = load_or_default(config_path)?;
    let grid = config.site.build_grid()?;
    let summary = grid.summary();

    println!(
        "Wind resource grid: {} directions x {} speeds ({} cells)",
        summary.direction_count,
        summary.speed_count,
        grid.cell_count()
    );
    println!("  {:>6}  {:>8}  {:>7}  {:>9}", "dir", "A (m/s)", "k", "freq (%)");
    for row in grid.sector_table() {
        println!(
            "  {:>6.1}  {:>8.3}  {:>7.3}  {:>9.3}",
            row.direction_deg,
            row.weibull_a,
            row.weibull_k,
            row.frequency * 100.0
        );
    }
    println!("  Frequency sum:     {:.9}", summary.frequency_sum);
    println!("  Mean A:            {:.3} m/s", summary.mean_weibull_a);
    println!("  Mean k:            {:.3}", summary.mean_weibull_k);
    println!("  Mean turbulence:   {:.3}", summary.mean_turbulence);
    println!("  Cell weight total: {:.6}", grid.cell_weights().sum());
    Ok(())
}

fn cmd_sweep(
    config_path: Option<&Path>,
    ti: &[f64],
    speed: Option<f64>,
    direction: Option<f64>,
    parallel: bool,
) -> AppResult<()> {
    let config = load_or_default(config_path)?;
    let grid = config.site.build_grid()?;
    let layout = config.layout.build()?;
    let engine = reference_engine(&config);
    let speed = speed.unwrap_or(config.sweep.speed);
    let direction = direction.unwrap_or(config.sweep.direction_deg);

    println!(
        "Sweeping {} turbulence values at {:.1} m/s, {:.0} deg ({} turbines, {})",
        ti.len(),
        speed,
        direction,
        layout.len(),
        engine.name()
    );

    let options = SweepOptions {
        parallel: parallel || config.sweep.parallel,
    };
    let samples = SensitivitySweepDriver::with_options(&engine, options)
        .sweep(&grid, &layout, ti, speed, direction);
    print_sweep_table(&samples);
    Ok(())
}

fn cmd_init_config(path: &Path) -> AppResult<()> {
    save_yaml(path, &AnalysisConfig::default())?;
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}

fn print_sweep_table(samples: &[SensitivitySample]) {
    println!("Sensitivity to turbulence intensity");
    println!("  {:>6}  {:>12}  status", "TI", "power (kW)");
    for s in samples {
        let note = match &s.message {
            Some(msg) => format!("{} ({})", s.status, msg),
            None => s.status.to_string(),
        };
        println!(
            "  {:>6.3}  {:>12.1}  {}",
            s.turbulence_intensity, s.total_power_kw, note
        );
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &AnalysisProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}

/// Plain-text rendering of report panels.
struct TextSurface<W: Write> {
    out: W,
    drawn: usize,
}

impl<W: Write> TextSurface<W> {
    const BAR_WIDTH: usize = 40;

    fn new(out: W) -> Self {
        Self { out, drawn: 0 }
    }

    fn write_panel(&mut self, panel: &Panel) -> io::Result<()> {
        writeln!(self.out, "== {} ==", panel.title)?;
        match &panel.content {
            PanelContent::Scatter {
                x_label,
                y_label,
                points,
                labels,
            } => {
                writeln!(self.out, "  {:<6} {:>10} {:>10}", "", x_label, y_label)?;
                for (label, [x, y]) in labels.iter().zip(points) {
                    writeln!(self.out, "  {:<6} {:>10.1} {:>10.1}", label, x, y)?;
                }
            }
            PanelContent::Bars {
                y_label, labels, values, ..
            } => {
                writeln!(self.out, "  {}", y_label)?;
                let max = values.iter().copied().fold(0.0_f64, f64::max);
                for (label, value) in labels.iter().zip(values) {
                    let filled = if max > 0.0 {
                        ((value / max) * Self::BAR_WIDTH as f64).round() as usize
                    } else {
                        0
                    };
                    writeln!(
                        self.out,
                        "  {:>6} {:>10.2} {}",
                        label,
                        value,
                        "#".repeat(filled.min(Self::BAR_WIDTH))
                    )?;
                }
            }
            PanelContent::Line {
                x_label,
                y_label,
                points,
                failed,
            } => {
                writeln!(self.out, "  {:>10} {:>14}", x_label, y_label)?;
                for (i, [x, y]) in points.iter().enumerate() {
                    let mark = if failed.contains(&i) { "  failed" } else { "" };
                    writeln!(self.out, "  {:>10.3} {:>14.1}{}", x, y, mark)?;
                }
            }
            PanelContent::Text { rows } => {
                let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
                for (key, value) in rows {
                    writeln!(self.out, "  {:<width$}  {}", key, value, width = width)?;
                }
            }
            PanelContent::Diagnostic { message } => {
                writeln!(self.out, "  ! {}", message)?;
            }
        }
        writeln!(self.out)
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    fn acquire(&mut self) {
        self.drawn = 0;
    }

    fn draw(&mut self, panel: &Panel) -> Result<(), RenderError> {
        self.write_panel(panel)
            .map_err(|e| RenderError::Surface(e.to_string()))?;
        self.drawn += 1;
        Ok(())
    }

    fn release(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_overrides_switch_to_row() {
        let mut config = AnalysisConfig {
            layout: LayoutConfig::Explicit {
                x: vec![0.0],
                y: vec![0.0],
            },
            ..Default::default()
        };
        apply_layout_overrides(&mut config, Some(5), None);
        assert_eq!(
            config.layout,
            LayoutConfig::Row {
                turbine_count: 5,
                spacing_m: 400.0
            }
        );

        apply_layout_overrides(&mut config, None, Some(700.0));
        assert_eq!(
            config.layout,
            LayoutConfig::Row {
                turbine_count: 5,
                spacing_m: 700.0
            }
        );
    }

    #[test]
    fn text_surface_writes_every_panel_kind() {
        let mut surface = TextSurface::new(Vec::new());
        let panels = [
            PanelContent::Scatter {
                x_label: "x (m)".into(),
                y_label: "y (m)".into(),
                points: vec![[0.0, 0.0], [400.0, 0.0]],
                labels: vec!["T1".into(), "T2".into()],
            },
            PanelContent::Bars {
                x_label: "Turbine".into(),
                y_label: "Mean power (kW)".into(),
                labels: vec!["T1".into(), "T2".into()],
                values: vec![1000.0, 500.0],
            },
            PanelContent::Line {
                x_label: "TI".into(),
                y_label: "Total power (kW)".into(),
                points: vec![[0.06, 3200.0], [0.08, 0.0]],
                failed: vec![1],
            },
            PanelContent::Text {
                rows: vec![("Net AEP".into(), "21.4 GWh".into())],
            },
            PanelContent::Diagnostic {
                message: "per-turbine power unavailable".into(),
            },
        ];
        surface.acquire();
        for content in panels {
            let panel = Panel {
                kind: wf_app::PanelKind::TurbinePower,
                title: "Mean power per turbine".into(),
                content,
            };
            surface.draw(&panel).unwrap();
        }
        surface.release();

        let text = String::from_utf8(surface.out).unwrap();
        assert_eq!(surface.drawn, 5);
        assert!(text.contains("T2          400.0        0.0"));
        assert!(text.contains(&"#".repeat(40)));
        assert!(text.contains(&format!("500.00 {}\n", "#".repeat(20))));
        assert!(text.contains("0.080            0.0  failed"));
        assert!(!text.contains("3200.0  failed"));
        assert!(text.contains("Net AEP  21.4 GWh"));
        assert!(text.contains("! per-turbine power unavailable"));
    }

    #[test]
    fn cli_parses_ti_list() {
        let cli = Cli::parse_from(["wf-cli", "sweep", "--ti", "0.06,0.08,0.1", "--parallel"]);
        match cli.command {
            Commands::Sweep { ti, parallel, .. } => {
                assert_eq!(ti, vec![0.06, 0.08, 0.1]);
                assert!(parallel);
            }
            _ => panic!("expected sweep command"),
        }
    }
}
