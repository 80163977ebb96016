#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod run_worker;
mod surface;

use app::WindFarmApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("WindFarm"),
        ..Default::default()
    };

    eframe::run_native(
        "WindFarm",
        options,
        Box::new(|cc| Ok(Box::new(WindFarmApp::new(cc)))),
    )
}
