//! Dashboard View Module
//! Pure translation of sidebar control state into chart descriptions.
//! The GUI layer only displays what `render` returns, so everything here is
//! testable without a window.

use crate::charts::{Chart, ChartBuilder, ChartKind, ChartSpec, InvalidDataError, Tile};
use crate::data::{SampleData, ValueFormat};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Which view of the dataset the main panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Arr,
    Segments,
    Movement,
    Kpis,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Arr,
        Metric::Segments,
        Metric::Movement,
        Metric::Kpis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Arr => "ARR Forecast",
            Metric::Segments => "Segment Breakdown",
            Metric::Movement => "ARR Movement",
            Metric::Kpis => "Summary KPIs",
        }
    }
}

/// Sidebar control state, passed explicitly into `render`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub metric: Metric,
}

impl Controls {
    /// Controls covering the full extent of the dataset, showing the ARR view.
    pub fn spanning(data: &SampleData) -> Self {
        let fallback = NaiveDate::default();
        Self {
            date_from: data.series.first_period().unwrap_or(fallback),
            date_to: data.series.last_period().unwrap_or(fallback),
            metric: Metric::Arr,
        }
    }
}

/// Invalid control state.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("date range is inverted: {from} is after {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },
}

/// Anything that can stop a render. Both kinds are shown inline in the UI
/// and never abort the process.
#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Controls(#[from] ValidationError),
    #[error(transparent)]
    Chart(#[from] InvalidDataError),
}

/// Everything the main panel needs for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardView {
    pub charts: Vec<Chart>,
    pub tiles: Vec<Tile>,
}

/// Filter the dataset to the control date range and build the charts for the
/// selected metric. Stateless: every interaction recomputes from the base
/// dataset.
pub fn render(controls: &Controls, data: &SampleData) -> Result<DashboardView, RenderError> {
    if controls.date_from > controls.date_to {
        return Err(ValidationError::InvertedDateRange {
            from: controls.date_from,
            to: controls.date_to,
        }
        .into());
    }

    let filtered = data.series.clamp_to(controls.date_from, controls.date_to);
    debug!(
        metric = controls.metric.label(),
        periods = filtered.len(),
        "rendering dashboard view"
    );

    let kpi_spec = ChartSpec::new(ChartKind::Bar, "Summary KPIs", ValueFormat::Number);

    let view = match controls.metric {
        Metric::Arr => {
            let spec = ChartSpec::new(ChartKind::Line, "5-Year ARR Forecast", ValueFormat::Currency)
                .with_x("period")
                .with_y(&["actual", "target"]);
            DashboardView {
                charts: vec![ChartBuilder::build_line(&filtered, &spec)?],
                tiles: ChartBuilder::build_kpi_tiles(&data.kpis, &kpi_spec),
            }
        }
        Metric::Segments => {
            let bar_spec =
                ChartSpec::new(ChartKind::Bar, "ARR by Customer Segment", ValueFormat::Currency)
                    .with_x("segment")
                    .with_y(&["revenue"])
                    .with_color("segment");
            let donut_spec = ChartSpec::new(ChartKind::Pie, "Segment Mix", ValueFormat::Currency)
                .with_color("segment");
            DashboardView {
                charts: vec![
                    ChartBuilder::build_segment_bar(&data.breakdown, &bar_spec)?,
                    ChartBuilder::build_segment_donut(&data.breakdown, &donut_spec)?,
                ],
                tiles: Vec::new(),
            }
        }
        Metric::Movement => {
            let spec = ChartSpec::new(
                ChartKind::Waterfall,
                "Annual ARR Waterfall",
                ValueFormat::Currency,
            )
            .with_x("movement")
            .with_y(&["delta"]);
            DashboardView {
                charts: vec![ChartBuilder::build_waterfall(&data.bridge, &spec)?],
                tiles: Vec::new(),
            }
        }
        Metric::Kpis => DashboardView {
            charts: Vec::new(),
            tiles: ChartBuilder::build_kpi_tiles(&data.kpis, &kpi_spec),
        },
    };

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartContent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn controls(from: NaiveDate, to: NaiveDate, metric: Metric) -> Controls {
        Controls {
            date_from: from,
            date_to: to,
            metric,
        }
    }

    #[test]
    fn inverted_range_is_a_validation_error() {
        let data = SampleData::load();
        let result = render(
            &controls(date(2025, 1, 1), date(2024, 1, 1), Metric::Arr),
            &data,
        );
        assert!(matches!(
            result,
            Err(RenderError::Controls(ValidationError::InvertedDateRange { .. }))
        ));
    }

    #[test]
    fn filtering_is_inclusive_of_both_endpoints() {
        let data = SampleData::load();
        // 2024-06-30 and 2025-03-31 are both quarter-end periods.
        let view = render(
            &controls(date(2024, 6, 30), date(2025, 3, 31), Metric::Arr),
            &data,
        )
        .unwrap();

        let lines = match &view.charts[0].content {
            ChartContent::Lines(lines) => lines,
            _ => panic!("expected line content"),
        };
        let periods: Vec<NaiveDate> = lines[0].points.iter().map(|p| p.period).collect();
        assert_eq!(
            periods,
            vec![
                date(2024, 6, 30),
                date(2024, 9, 30),
                date(2024, 12, 31),
                date(2025, 3, 31),
            ]
        );
    }

    #[test]
    fn equal_endpoints_keep_exactly_that_period() {
        let data = SampleData::load();
        let view = render(
            &controls(date(2024, 9, 30), date(2024, 9, 30), Metric::Arr),
            &data,
        )
        .unwrap();
        match &view.charts[0].content {
            ChartContent::Lines(lines) => assert_eq!(lines[0].points.len(), 1),
            _ => panic!("expected line content"),
        }
    }

    #[test]
    fn range_outside_data_surfaces_empty_series_error() {
        let data = SampleData::load();
        let result = render(
            &controls(date(2040, 1, 1), date(2041, 1, 1), Metric::Arr),
            &data,
        );
        assert_eq!(
            result,
            Err(RenderError::Chart(InvalidDataError::EmptySeries))
        );
    }

    #[test]
    fn each_metric_produces_its_charts() {
        let data = SampleData::load();
        let full = Controls::spanning(&data);

        let arr = render(&full, &data).unwrap();
        assert_eq!(arr.charts.len(), 1);
        assert_eq!(arr.tiles.len(), data.kpis.len());

        let segments = render(
            &Controls {
                metric: Metric::Segments,
                ..full
            },
            &data,
        )
        .unwrap();
        assert_eq!(segments.charts.len(), 2);

        let movement = render(
            &Controls {
                metric: Metric::Movement,
                ..full
            },
            &data,
        )
        .unwrap();
        assert_eq!(movement.charts.len(), 1);
        assert_eq!(movement.charts[0].spec.kind, ChartKind::Waterfall);

        let kpis = render(
            &Controls {
                metric: Metric::Kpis,
                ..full
            },
            &data,
        )
        .unwrap();
        assert!(kpis.charts.is_empty());
        assert_eq!(kpis.tiles.len(), data.kpis.len());
    }

    #[test]
    fn render_is_deterministic() {
        let data = SampleData::load();
        let full = Controls::spanning(&data);
        assert_eq!(render(&full, &data), render(&full, &data));
    }
}
