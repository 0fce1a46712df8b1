//! ARR Forecast Dashboard
//!
//! A Rust application that renders an in-memory ARR sample dataset as
//! interactive charts with sidebar filters.

mod charts;
mod data;
mod gui;
mod view;

use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("ARR Forecast Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ARR Forecast Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
