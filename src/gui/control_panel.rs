//! Control Panel Widget
//! Left side panel with the date range picker and metric selector.

use crate::data::SampleData;
use crate::view::{Controls, Metric};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};
use egui_extras::DatePickerButton;

/// Left side control panel. Holds the current control state; the app reads
/// it back every frame and recomputes the view.
pub struct ControlPanel {
    pub controls: Controls,
    full_range: (NaiveDate, NaiveDate),
}

impl ControlPanel {
    pub fn new(data: &SampleData) -> Self {
        let controls = Controls::spanning(data);
        Self {
            full_range: (controls.date_from, controls.date_to),
            controls,
        }
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 ARR Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("SaaS Revenue Forecast")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        let label_width = 60.0;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("From:"));
            ui.add(
                DatePickerButton::new(&mut self.controls.date_from)
                    .id_salt("date_from")
                    .show_icon(false),
            );
        });
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("To:"));
            ui.add(
                DatePickerButton::new(&mut self.controls.date_to)
                    .id_salt("date_to")
                    .show_icon(false),
            );
        });

        if self.controls.date_from > self.controls.date_to {
            ui.add_space(5.0);
            ui.label(
                RichText::new("From-date is after to-date")
                    .size(11.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Metric Section =====
        ui.label(RichText::new("📈 Metric").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("metric")
            .width(180.0)
            .selected_text(self.controls.metric.label())
            .show_ui(ui, |ui| {
                for metric in Metric::ALL {
                    if ui
                        .selectable_label(self.controls.metric == metric, metric.label())
                        .clicked()
                    {
                        self.controls.metric = metric;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Reset =====
        ui.vertical_centered(|ui| {
            if ui
                .add(egui::Button::new(RichText::new("↺ Reset Range").size(13.0)))
                .clicked()
            {
                self.controls.date_from = self.full_range.0;
                self.controls.date_to = self.full_range.1;
            }
        });

        ui.add_space(10.0);
        ui.label(
            RichText::new(format!(
                "Dataset: {} to {}",
                self.full_range.0, self.full_range.1
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
    }
}
