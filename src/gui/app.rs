//! Dashboard Main Application
//! Main window with control panel and chart viewer. Each frame recomputes
//! the view from the current controls over the immutable base dataset.

use crate::data::SampleData;
use crate::gui::{ChartViewer, ControlPanel};
use crate::view;
use egui::{Color32, RichText, SidePanel};
use tracing::info;

/// Main application window.
pub struct DashboardApp {
    data: SampleData,
    control_panel: ControlPanel,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let data = SampleData::load();
        info!(periods = data.series.len(), "dashboard dataset ready");
        let control_panel = ControlPanel::new(&data);
        Self {
            data,
            control_panel,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.control_panel.show(ui);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            match view::render(&self.control_panel.controls, &self.data) {
                Ok(dashboard) => ChartViewer::show(ui, &dashboard),
                Err(error) => {
                    // Shown inline; the next interaction recomputes.
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new(format!("⚠ {}", error))
                                .size(15.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    });
                }
            }
        });
    }
}
