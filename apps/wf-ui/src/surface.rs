//! egui frontend for report panels.
//!
//! egui redraws every frame, so the surface keeps the accepted panels and
//! `show_panel` paints them on each pass.

use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};
use wf_app::{Panel, PanelContent, RenderError, RenderSurface};

#[derive(Default)]
pub struct EguiSurface {
    panels: Vec<Panel>,
    active: bool,
}

impl EguiSurface {
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    fn check(panel: &Panel) -> Result<(), RenderError> {
        let consistent = match &panel.content {
            PanelContent::Scatter { points, labels, .. } => points.len() == labels.len(),
            PanelContent::Bars { labels, values, .. } => labels.len() == values.len(),
            PanelContent::Line { points, failed, .. } => failed.iter().all(|&i| i < points.len()),
            PanelContent::Text { .. } | PanelContent::Diagnostic { .. } => true,
        };
        if consistent {
            Ok(())
        } else {
            Err(RenderError::Surface(format!(
                "inconsistent series in panel '{}'",
                panel.title
            )))
        }
    }
}

impl RenderSurface for EguiSurface {
    fn acquire(&mut self) {
        self.panels.clear();
        self.active = true;
    }

    fn draw(&mut self, panel: &Panel) -> Result<(), RenderError> {
        if !self.active {
            return Err(RenderError::Surface("surface not acquired".into()));
        }
        Self::check(panel)?;
        self.panels.push(panel.clone());
        Ok(())
    }

    fn release(&mut self) {
        self.active = false;
    }
}

pub fn show_panel(ui: &mut egui::Ui, panel: &Panel, height: f32) {
    ui.strong(&panel.title);
    let id = format!("panel_{:?}", panel.kind);

    match &panel.content {
        PanelContent::Scatter {
            x_label,
            y_label,
            points,
            labels,
        } => {
            Plot::new(id)
                .height(height)
                .data_aspect(1.0)
                .x_axis_label(x_label.as_str())
                .y_axis_label(y_label.as_str())
                .show(ui, |plot_ui| {
                    plot_ui.points(Points::new(points.clone()).radius(6.0).name("Turbines"));
                    for (label, [x, y]) in labels.iter().zip(points) {
                        plot_ui.text(Text::new(PlotPoint::new(*x, *y + 60.0), label.as_str()));
                    }
                });
        }
        PanelContent::Bars {
            x_label,
            y_label,
            labels,
            values,
        } => {
            let bars: Vec<Bar> = values
                .iter()
                .zip(labels)
                .enumerate()
                .map(|(i, (v, label))| Bar::new(i as f64, *v).width(0.7).name(label))
                .collect();
            Plot::new(id)
                .height(height)
                .x_axis_label(x_label.as_str())
                .y_axis_label(y_label.as_str())
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars));
                });
        }
        PanelContent::Line {
            x_label,
            y_label,
            points,
            failed,
        } => {
            let ok: Vec<[f64; 2]> = points
                .iter()
                .enumerate()
                .filter(|(i, _)| !failed.contains(i))
                .map(|(_, p)| *p)
                .collect();
            let bad: Vec<[f64; 2]> = failed.iter().filter_map(|&i| points.get(i).copied()).collect();
            Plot::new(id)
                .height(height)
                .legend(Legend::default())
                .x_axis_label(x_label.as_str())
                .y_axis_label(y_label.as_str())
                .show(ui, |plot_ui| {
                    let series: PlotPoints = ok.clone().into();
                    plot_ui.line(Line::new(series).name("Total power"));
                    plot_ui.points(Points::new(ok).radius(4.0));
                    if !bad.is_empty() {
                        plot_ui.points(
                            Points::new(bad)
                                .radius(5.0)
                                .color(egui::Color32::RED)
                                .name("Failed"),
                        );
                    }
                });
        }
        PanelContent::Text { rows } => {
            egui::Grid::new(id).striped(true).show(ui, |ui| {
                for (key, value) in rows {
                    ui.label(key);
                    ui.label(value);
                    ui.end_row();
                }
            });
        }
        PanelContent::Diagnostic { message } => {
            ui.colored_label(egui::Color32::RED, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_app::PanelKind;

    fn bars(labels: usize, values: usize) -> Panel {
        Panel {
            kind: PanelKind::TurbinePower,
            title: "Mean power per turbine".into(),
            content: PanelContent::Bars {
                x_label: "Turbine".into(),
                y_label: "kW".into(),
                labels: (0..labels).map(|i| format!("T{}", i + 1)).collect(),
                values: vec![1.0; values],
            },
        }
    }

    #[test]
    fn draw_requires_acquire() {
        let mut surface = EguiSurface::default();
        assert!(surface.draw(&bars(2, 2)).is_err());

        surface.acquire();
        surface.draw(&bars(2, 2)).unwrap();
        surface.release();
        assert_eq!(surface.panels().len(), 1);
    }

    #[test]
    fn inconsistent_series_are_refused() {
        let mut surface = EguiSurface::default();
        surface.acquire();
        let err = surface.draw(&bars(3, 2)).unwrap_err();
        assert!(matches!(err, RenderError::Surface(_)));
        assert!(surface.panels().is_empty());
    }

    #[test]
    fn acquire_starts_a_fresh_report() {
        let mut surface = EguiSurface::default();
        surface.acquire();
        surface.draw(&bars(1, 1)).unwrap();
        surface.release();
        surface.acquire();
        assert!(surface.panels().is_empty());
    }
}
