//! Chart Builder Module
//! Pure construction of renderable chart descriptions from dataset shapes.
//! Nothing here touches the UI; the descriptions are plain data so chart
//! construction stays testable without a window.

use crate::charts::spec::ChartSpec;
use crate::data::{amounts_reconcile, ForecastSeries, Kpi, MovementBridge, SegmentBreakdown};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Malformed input to a chart builder.
#[derive(Error, Debug, PartialEq)]
pub enum InvalidDataError {
    #[error("forecast series is empty")]
    EmptySeries,
    #[error("segment breakdown is empty")]
    EmptyBreakdown,
    #[error("segment '{segment}' has negative revenue ({revenue})")]
    NegativeRevenue { segment: String, revenue: f64 },
    #[error("movement bridge needs a starting and an ending step")]
    IncompleteBridge,
    #[error("bridge does not reconcile: running total {computed:.2} vs stated ending {stated:.2}")]
    Unreconciled { computed: f64, stated: f64 },
}

/// Plain sRGB color, converted to the UI toolkit's color type at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

// Dashboard color scheme.
pub const PRIMARY: Rgb = Rgb(31, 119, 180); // Blue
pub const SUCCESS: Rgb = Rgb(44, 160, 44); // Green
pub const DANGER: Rgb = Rgb(214, 39, 40); // Red
pub const WARNING: Rgb = Rgb(255, 127, 14); // Orange
pub const INFO: Rgb = Rgb(23, 162, 184); // Teal
pub const SECONDARY: Rgb = Rgb(108, 117, 125); // Gray

pub const SEGMENT_PALETTE: [Rgb; 6] = [PRIMARY, SUCCESS, WARNING, INFO, DANGER, SECONDARY];

/// One point of a line series, hover text precomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub period: NaiveDate,
    pub value: f64,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<LinePoint>,
}

/// A categorical bar. `base` is nonzero for floating waterfall bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub base: f64,
    pub color: Rgb,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Fraction of the total, in `[0, 1]`.
    pub share: f64,
    pub color: Rgb,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartContent {
    Lines(Vec<LineSeries>),
    Bars(Vec<Bar>),
    Slices(Vec<Slice>),
}

/// Renderable chart description: the spec it was built from plus the
/// resolved geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub spec: ChartSpec,
    pub content: ChartContent,
}

/// One formatted KPI tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub label: String,
    pub value: f64,
    pub text: String,
}

/// Maps dataset shapes into chart descriptions. All builders are pure:
/// identical input yields a structurally identical chart.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Actual and target ARR as two lines over the period axis.
    pub fn build_line(
        series: &ForecastSeries,
        spec: &ChartSpec,
    ) -> Result<Chart, InvalidDataError> {
        if series.is_empty() {
            return Err(InvalidDataError::EmptySeries);
        }

        let line = |name: &str, color: Rgb, pick: fn(&crate::data::ForecastPoint) -> f64| {
            LineSeries {
                name: name.to_string(),
                color,
                points: series
                    .points()
                    .iter()
                    .map(|p| LinePoint {
                        period: p.period,
                        value: pick(p),
                        hover: format!(
                            "{}\n{}: {}",
                            p.period,
                            name,
                            spec.value_format.format(pick(p))
                        ),
                    })
                    .collect(),
            }
        };

        debug!(title = %spec.title, periods = series.len(), "built line chart");
        Ok(Chart {
            spec: spec.clone(),
            content: ChartContent::Lines(vec![
                line("Actual ARR", PRIMARY, |p| p.actual),
                line("Target ARR", SECONDARY, |p| p.target),
            ]),
        })
    }

    /// One bar per segment, largest revenue first, ties broken by name.
    pub fn build_segment_bar(
        breakdown: &SegmentBreakdown,
        spec: &ChartSpec,
    ) -> Result<Chart, InvalidDataError> {
        let segments = Self::sorted_segments(breakdown)?;

        let bars = segments
            .iter()
            .enumerate()
            .map(|(i, (name, revenue))| Bar {
                label: name.clone(),
                value: *revenue,
                base: 0.0,
                color: SEGMENT_PALETTE[i % SEGMENT_PALETTE.len()],
                hover: format!("{}\nRevenue: {}", name, spec.value_format.format(*revenue)),
            })
            .collect();

        Ok(Chart {
            spec: spec.clone(),
            content: ChartContent::Bars(bars),
        })
    }

    /// Donut view of the same breakdown, slices carrying share-of-total.
    pub fn build_segment_donut(
        breakdown: &SegmentBreakdown,
        spec: &ChartSpec,
    ) -> Result<Chart, InvalidDataError> {
        let segments = Self::sorted_segments(breakdown)?;
        let total: f64 = segments.iter().map(|(_, v)| v).sum();

        let slices = segments
            .iter()
            .enumerate()
            .map(|(i, (name, revenue))| {
                let share = if total > 0.0 { revenue / total } else { 0.0 };
                Slice {
                    label: name.clone(),
                    value: *revenue,
                    share,
                    color: SEGMENT_PALETTE[i % SEGMENT_PALETTE.len()],
                    hover: format!(
                        "{}: {} ({:.1}%)",
                        name,
                        spec.value_format.format(*revenue),
                        share * 100.0
                    ),
                }
            })
            .collect();

        Ok(Chart {
            spec: spec.clone(),
            content: ChartContent::Slices(slices),
        })
    }

    /// Cumulative bridge from starting to ending ARR. The first and last
    /// steps are absolute columns, everything between floats on the running
    /// total. Fails when the running total misses the stated ending value.
    pub fn build_waterfall(
        bridge: &MovementBridge,
        spec: &ChartSpec,
    ) -> Result<Chart, InvalidDataError> {
        let steps = &bridge.steps;
        if steps.len() < 2 {
            return Err(InvalidDataError::IncompleteBridge);
        }

        let start = &steps[0];
        let end = steps
            .last()
            .ok_or(InvalidDataError::IncompleteBridge)?;

        let mut bars = Vec::with_capacity(steps.len());
        let mut running = start.delta;
        bars.push(Bar {
            label: start.label.clone(),
            value: start.delta,
            base: 0.0,
            color: SECONDARY,
            hover: format!("{}\n{}", start.label, spec.value_format.format(start.delta)),
        });

        for step in &steps[1..steps.len() - 1] {
            let (base, color) = if step.delta >= 0.0 {
                (running, SUCCESS)
            } else {
                (running + step.delta, DANGER)
            };
            running += step.delta;
            bars.push(Bar {
                label: step.label.clone(),
                value: step.delta.abs(),
                base,
                color,
                hover: format!(
                    "{}\n{}\nRunning total: {}",
                    step.label,
                    spec.value_format.format(step.delta),
                    spec.value_format.format(running)
                ),
            });
        }

        if !amounts_reconcile(running, end.delta) {
            return Err(InvalidDataError::Unreconciled {
                computed: running,
                stated: end.delta,
            });
        }

        bars.push(Bar {
            label: end.label.clone(),
            value: end.delta,
            base: 0.0,
            color: PRIMARY,
            hover: format!("{}\n{}", end.label, spec.value_format.format(end.delta)),
        });

        Ok(Chart {
            spec: spec.clone(),
            content: ChartContent::Bars(bars),
        })
    }

    /// One tile per KPI, input order preserved. Each KPI carries its own
    /// display format, so this never fails.
    pub fn build_kpi_tiles(kpis: &[Kpi], spec: &ChartSpec) -> Vec<Tile> {
        debug!(title = %spec.title, count = kpis.len(), "built KPI tiles");
        kpis.iter()
            .map(|kpi| Tile {
                label: kpi.label.clone(),
                value: kpi.value,
                text: kpi.format.format(kpi.value),
            })
            .collect()
    }

    /// Validated segments, descending by revenue with alphabetical tie-break.
    fn sorted_segments(
        breakdown: &SegmentBreakdown,
    ) -> Result<Vec<(String, f64)>, InvalidDataError> {
        if breakdown.is_empty() {
            return Err(InvalidDataError::EmptyBreakdown);
        }
        if let Some((segment, &revenue)) =
            breakdown.segments.iter().find(|(_, &v)| v < 0.0)
        {
            return Err(InvalidDataError::NegativeRevenue {
                segment: segment.clone(),
                revenue,
            });
        }

        let mut segments: Vec<(String, f64)> = breakdown
            .segments
            .iter()
            .map(|(name, &revenue)| (name.clone(), revenue))
            .collect();
        segments.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::ChartKind;
    use crate::data::{BridgeStep, ForecastPoint, ValueFormat};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_series(n: usize) -> ForecastSeries {
        let points = (0..n)
            .map(|i| ForecastPoint {
                period: date(2024, 1, 1) + chrono::Duration::days(i as i64 * 30),
                actual: 100.0 + i as f64,
                target: 110.0 + i as f64,
            })
            .collect();
        ForecastSeries::from_points(points).unwrap()
    }

    fn line_spec() -> ChartSpec {
        ChartSpec::new(ChartKind::Line, "ARR Forecast", ValueFormat::Currency)
            .with_x("period")
            .with_y(&["actual", "target"])
    }

    fn bar_spec() -> ChartSpec {
        ChartSpec::new(ChartKind::Bar, "ARR by Segment", ValueFormat::Currency)
            .with_x("segment")
            .with_y(&["revenue"])
    }

    #[test]
    fn line_chart_has_one_point_per_period_per_line() {
        for n in [1, 5, 20] {
            let chart = ChartBuilder::build_line(&sample_series(n), &line_spec()).unwrap();
            match chart.content {
                ChartContent::Lines(lines) => {
                    assert_eq!(lines.len(), 2);
                    for line in lines {
                        assert_eq!(line.points.len(), n);
                    }
                }
                _ => panic!("expected line content"),
            }
        }
    }

    #[test]
    fn line_chart_rejects_empty_series() {
        let empty = ForecastSeries::from_points(vec![]).unwrap();
        assert_eq!(
            ChartBuilder::build_line(&empty, &line_spec()),
            Err(InvalidDataError::EmptySeries)
        );
    }

    #[test]
    fn segment_bars_sorted_descending_with_alpha_tiebreak() {
        let breakdown = SegmentBreakdown::from_pairs([
            ("SMB".to_string(), 200.0),
            ("Enterprise".to_string(), 500.0),
            ("Startup".to_string(), 200.0),
            ("Mid-Market".to_string(), 300.0),
        ]);

        let chart = ChartBuilder::build_segment_bar(&breakdown, &bar_spec()).unwrap();
        let labels: Vec<String> = match chart.content {
            ChartContent::Bars(bars) => bars.into_iter().map(|b| b.label).collect(),
            _ => panic!("expected bar content"),
        };
        // 200.0 tie: "SMB" before "Startup" alphabetically.
        assert_eq!(labels, vec!["Enterprise", "Mid-Market", "SMB", "Startup"]);
    }

    #[test]
    fn segment_bar_rejects_empty_and_negative() {
        let empty = SegmentBreakdown::default();
        assert_eq!(
            ChartBuilder::build_segment_bar(&empty, &bar_spec()),
            Err(InvalidDataError::EmptyBreakdown)
        );

        let negative = SegmentBreakdown::from_pairs([("Enterprise".to_string(), -10.0)]);
        assert!(matches!(
            ChartBuilder::build_segment_bar(&negative, &bar_spec()),
            Err(InvalidDataError::NegativeRevenue { .. })
        ));
    }

    #[test]
    fn donut_shares_sum_to_one() {
        let breakdown = SegmentBreakdown::from_pairs([
            ("Enterprise".to_string(), 600.0),
            ("SMB".to_string(), 400.0),
        ]);
        let spec = ChartSpec::new(ChartKind::Pie, "Segment Mix", ValueFormat::Currency);
        let chart = ChartBuilder::build_segment_donut(&breakdown, &spec).unwrap();
        match chart.content {
            ChartContent::Slices(slices) => {
                let total_share: f64 = slices.iter().map(|s| s.share).sum();
                assert!((total_share - 1.0).abs() < 1e-12);
            }
            _ => panic!("expected slice content"),
        }
    }

    fn waterfall_spec() -> ChartSpec {
        ChartSpec::new(ChartKind::Waterfall, "ARR Movement", ValueFormat::Currency)
            .with_x("movement")
            .with_y(&["delta"])
    }

    #[test]
    fn waterfall_reconciles_on_consistent_bridge() {
        let bridge = MovementBridge::new(vec![
            BridgeStep::new("Start", 1_000_000.0),
            BridgeStep::new("New", 150_000.0),
            BridgeStep::new("Expansion", 80_000.0),
            BridgeStep::new("Churn", -60_000.0),
            BridgeStep::new("End", 1_170_000.0),
        ]);

        let chart = ChartBuilder::build_waterfall(&bridge, &waterfall_spec()).unwrap();
        match chart.content {
            ChartContent::Bars(bars) => {
                assert_eq!(bars.len(), 5);
                // Churn floats below the pre-churn running total.
                let churn = &bars[3];
                assert_eq!(churn.base, 1_170_000.0);
                assert_eq!(churn.value, 60_000.0);
                assert_eq!(churn.color, DANGER);
            }
            _ => panic!("expected bar content"),
        }
    }

    #[test]
    fn waterfall_rejects_unreconciled_bridge() {
        let bridge = MovementBridge::new(vec![
            BridgeStep::new("Start", 1_000_000.0),
            BridgeStep::new("New", 150_000.0),
            BridgeStep::new("Expansion", 80_000.0),
            BridgeStep::new("Churn", -60_000.0),
            BridgeStep::new("End", 1_200_000.0),
        ]);

        assert!(matches!(
            ChartBuilder::build_waterfall(&bridge, &waterfall_spec()),
            Err(InvalidDataError::Unreconciled { .. })
        ));
    }

    #[test]
    fn waterfall_tolerates_tiny_drift() {
        let bridge = MovementBridge::new(vec![
            BridgeStep::new("Start", 1_000_000.0),
            BridgeStep::new("New", 170_000.0),
            BridgeStep::new("End", 1_170_000.5),
        ]);
        // 0.5 on 1.17M is within the relative tolerance.
        assert!(ChartBuilder::build_waterfall(&bridge, &waterfall_spec()).is_ok());
    }

    #[test]
    fn waterfall_rejects_short_bridge() {
        let bridge = MovementBridge::new(vec![BridgeStep::new("Start", 1.0)]);
        assert_eq!(
            ChartBuilder::build_waterfall(&bridge, &waterfall_spec()),
            Err(InvalidDataError::IncompleteBridge)
        );
    }

    #[test]
    fn kpi_tiles_preserve_order_and_format() {
        let kpis = vec![
            Kpi::new("Current ARR", 1_234_567.0, ValueFormat::Currency),
            Kpi::new("YoY Growth", 0.153, ValueFormat::Percent),
        ];
        let spec = ChartSpec::new(ChartKind::Bar, "Summary", ValueFormat::Number);
        let tiles = ChartBuilder::build_kpi_tiles(&kpis, &spec);

        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].label, "Current ARR");
        assert_eq!(tiles[0].text, "$1,234,567");
        assert_eq!(tiles[1].text, "15.3%");
    }

    #[test]
    fn builders_are_deterministic() {
        let series = sample_series(8);
        let a = ChartBuilder::build_line(&series, &line_spec()).unwrap();
        let b = ChartBuilder::build_line(&series, &line_spec()).unwrap();
        assert_eq!(a, b);
    }
}
