//! Chart Viewer Widget
//! Scrollable main panel that displays KPI tiles and interactive charts
//! using egui_plot. Interprets chart descriptions; it never builds them.

use crate::charts::{Bar as BarDesc, Chart, ChartContent, LineSeries, Rgb, Slice, Tile};
use crate::data::ValueFormat;
use crate::view::DashboardView;
use chrono::{Datelike, NaiveDate};
use egui::{Align2, Color32, FontId, RichText, ScrollArea, Sense, Shape, Stroke, Vec2};
use egui_plot::{BarChart, Legend, Line, Plot, PlotPoints, Points};
use std::f32::consts::{FRAC_PI_2, TAU};

const CHART_HEIGHT: f32 = 320.0;
const CHART_SPACING: f32 = 15.0;
const DONUT_SIZE: f32 = 220.0;

/// Main panel displaying the rendered dashboard view.
pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, view: &DashboardView) {
        if view.charts.is_empty() && view.tiles.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if !view.tiles.is_empty() {
                    Self::draw_tiles(ui, &view.tiles);
                    ui.add_space(CHART_SPACING);
                }

                for chart in &view.charts {
                    Self::draw_chart_card(ui, chart);
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    /// One KPI card per tile, in a wrapped row.
    fn draw_tiles(ui: &mut egui::Ui, tiles: &[Tile]) {
        ui.horizontal_wrapped(|ui| {
            for tile in tiles {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            ui.set_min_width(120.0);
                            ui.label(
                                RichText::new(&tile.label).size(11.0).color(Color32::GRAY),
                            );
                            ui.label(RichText::new(&tile.text).size(20.0).strong());
                        });
                    });
                ui.add_space(10.0);
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &Chart) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&chart.spec.title).size(16.0).strong());
                ui.add_space(8.0);

                match &chart.content {
                    ChartContent::Lines(lines) => Self::draw_line_chart(ui, chart, lines),
                    ChartContent::Bars(bars) => Self::draw_bar_chart(ui, chart, bars),
                    ChartContent::Slices(slices) => Self::draw_donut_chart(ui, slices),
                }
            });
    }

    fn draw_line_chart(ui: &mut egui::Ui, chart: &Chart, lines: &[LineSeries]) {
        let value_format = chart.spec.value_format;

        Plot::new(format!("line_{}", chart.spec.title))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(chart.spec.x_field.clone())
            .x_axis_formatter(|mark, _range| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%b %Y").to_string())
                    .unwrap_or_default()
            })
            .y_axis_formatter(move |mark, _range| value_format.format(mark.value))
            .label_formatter(move |name, point| {
                let period = NaiveDate::from_num_days_from_ce_opt(point.x.round() as i32)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    format!("{}\n{}", period, value_format.format(point.y))
                } else {
                    format!("{}\n{}: {}", period, name, value_format.format(point.y))
                }
            })
            .show(ui, |plot_ui| {
                for series in lines {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .map(|p| [p.period.num_days_from_ce() as f64, p.value])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(color32(series.color))
                            .width(2.0)
                            .name(&series.name),
                    );

                    let markers: PlotPoints = series
                        .points
                        .iter()
                        .map(|p| [p.period.num_days_from_ce() as f64, p.value])
                        .collect();
                    plot_ui.points(
                        Points::new(markers)
                            .radius(3.0)
                            .color(color32(series.color)),
                    );
                }
            });
    }

    fn draw_bar_chart(ui: &mut egui::Ui, chart: &Chart, bars: &[BarDesc]) {
        let value_format = chart.spec.value_format;
        let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
        let hovers: Vec<String> = bars.iter().map(|b| b.hover.clone()).collect();

        let plot_bars: Vec<egui_plot::Bar> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                egui_plot::Bar::new(i as f64, bar.value)
                    .base_offset(bar.base)
                    .width(0.6)
                    .fill(color32(bar.color))
            })
            .collect();

        let bar_chart = BarChart::new(plot_bars).element_formatter(Box::new(move |bar, _| {
            hovers
                .get(bar.argument.round() as usize)
                .cloned()
                .unwrap_or_default()
        }));

        Plot::new(format!("bars_{}", chart.spec.title))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 0.25 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_axis_formatter(move |mark, _range| value_format.format(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(bar_chart);
            });
    }

    /// Donut drawn with the painter; egui_plot has no pie primitive.
    fn draw_donut_chart(ui: &mut egui::Ui, slices: &[Slice]) {
        ui.horizontal(|ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::splat(DONUT_SIZE), Sense::hover());
            let rect = response.rect;
            let center = rect.center();
            let radius = rect.width().min(rect.height()) * 0.45;

            let mut angle = -FRAC_PI_2;
            for slice in slices {
                let mut remaining = slice.share as f32 * TAU;
                // Wedges over 90 degrees are split so each piece stays convex.
                while remaining > 0.0 {
                    let sweep = remaining.min(FRAC_PI_2);
                    let steps = 24;
                    let mut points = vec![center];
                    for i in 0..=steps {
                        let a = angle + sweep * i as f32 / steps as f32;
                        points.push(center + Vec2::angled(a) * radius);
                    }
                    painter.add(Shape::convex_polygon(
                        points,
                        color32(slice.color),
                        Stroke::NONE,
                    ));
                    angle += sweep;
                    remaining -= sweep;
                }
            }

            // Hole plus total in the middle.
            painter.circle_filled(center, radius * 0.55, ui.visuals().panel_fill);
            let total: f64 = slices.iter().map(|s| s.value).sum();
            painter.text(
                center,
                Align2::CENTER_CENTER,
                ValueFormat::Currency.format(total),
                FontId::proportional(14.0),
                ui.visuals().text_color(),
            );

            ui.add_space(15.0);

            // Legend
            ui.vertical(|ui| {
                for slice in slices {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, color32(slice.color));
                        ui.label(RichText::new(&slice.hover).size(12.0));
                    });
                    ui.add_space(4.0);
                }
            });
        });
    }
}

fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}
