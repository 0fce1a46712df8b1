//! Sample Data Provider Module
//! Builds the deterministic in-memory dataset the dashboard renders.

use crate::data::model::{
    BridgeStep, ForecastPoint, ForecastSeries, Kpi, MovementBridge, SegmentBreakdown, ValueFormat,
};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed seed so every run produces the same dataset.
const SAMPLE_SEED: u64 = 42;

const BASE_ARR: f64 = 1_000_000.0;
const ANNUAL_GROWTH: f64 = 0.15;
const FORECAST_QUARTERS: usize = 20;
const FIRST_FORECAST_YEAR: i32 = 2024;

/// Share of total ARR per customer segment. Shares sum to 1.0 so the
/// breakdown reconciles with the series by construction.
const SEGMENT_SHARES: [(&str, f64); 4] = [
    ("Enterprise", 0.42),
    ("Mid-Market", 0.27),
    ("SMB", 0.19),
    ("Startup", 0.12),
];

/// The full dashboard dataset: series, breakdown, bridge and KPI tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    pub series: ForecastSeries,
    pub breakdown: SegmentBreakdown,
    pub bridge: MovementBridge,
    pub kpis: Vec<Kpi>,
}

impl SampleData {
    /// Generate the sample dataset. Always succeeds and returns the same
    /// structural output on every call within a process.
    pub fn load() -> Self {
        let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);

        let series = build_series(&mut rng);
        let points = series.points();

        // Latest-period ARR drives the breakdown and the headline KPIs.
        let current_arr = points.last().map(|p| p.actual).unwrap_or(BASE_ARR);
        let breakdown = build_breakdown(current_arr);
        debug_assert!(breakdown.reconciles_with(current_arr));
        let bridge = build_bridge(points);
        let kpis = build_kpis(points);

        debug!(
            periods = points.len(),
            segments = breakdown.segments.len(),
            "sample dataset generated"
        );

        Self {
            series,
            breakdown,
            bridge,
            kpis,
        }
    }
}

/// Quarter-end periods over five years with ~15% annual target growth and
/// small seeded noise on the actuals.
fn build_series(rng: &mut StdRng) -> ForecastSeries {
    let mut points = Vec::with_capacity(FORECAST_QUARTERS);

    for i in 0..FORECAST_QUARTERS {
        let period = quarter_end(i);
        let target = BASE_ARR * (1.0 + ANNUAL_GROWTH).powf(i as f64 / 4.0);
        let noise: f64 = rng.gen_range(-0.04..0.04);
        let actual = target * (1.0 + noise);
        points.push(ForecastPoint {
            period,
            actual,
            target,
        });
    }

    ForecastSeries::from_points_unchecked(points)
}

fn quarter_end(index: usize) -> NaiveDate {
    let year = FIRST_FORECAST_YEAR + (index / 4) as i32;
    let (month, day) = match index % 4 {
        0 => (3, 31),
        1 => (6, 30),
        2 => (9, 30),
        _ => (12, 31),
    };
    // Quarter-end month/day combinations are always valid dates.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn build_breakdown(total_arr: f64) -> SegmentBreakdown {
    SegmentBreakdown::from_pairs(
        SEGMENT_SHARES
            .iter()
            .map(|(name, share)| (name.to_string(), total_arr * share)),
    )
}

/// Trailing-year ARR movement: churn scales with the starting book, the
/// remaining required bookings split between new business and expansion so
/// the bridge reconciles exactly with the series endpoints.
fn build_bridge(points: &[ForecastPoint]) -> MovementBridge {
    let (start, end) = match (points.iter().rev().nth(4), points.last()) {
        (Some(s), Some(e)) => (s.actual, e.actual),
        _ => (BASE_ARR, BASE_ARR),
    };

    let churn = -(start * 0.05);
    let bookings_needed = end - start - churn;
    let new_business = bookings_needed * 0.6;
    let expansion = bookings_needed - new_business;

    MovementBridge::new(vec![
        BridgeStep::new("Starting ARR", start),
        BridgeStep::new("New business", new_business),
        BridgeStep::new("Expansion", expansion),
        BridgeStep::new("Churn & contraction", churn),
        BridgeStep::new("Ending ARR", end),
    ])
}

fn build_kpis(points: &[ForecastPoint]) -> Vec<Kpi> {
    let first = points.first().map(|p| p.actual).unwrap_or(BASE_ARR);
    let last = points.last().map(|p| p.actual).unwrap_or(BASE_ARR);
    let prev_quarter = points.iter().rev().nth(1).map(|p| p.actual).unwrap_or(last);
    let prev_year = points.iter().rev().nth(4).map(|p| p.actual).unwrap_or(last);

    vec![
        Kpi::new("Current ARR", last, ValueFormat::Currency),
        Kpi::new("Total Growth", (last - first) / first, ValueFormat::Percent),
        Kpi::new(
            "QoQ Growth",
            (last - prev_quarter) / prev_quarter,
            ValueFormat::Percent,
        ),
        Kpi::new(
            "YoY Growth",
            (last - prev_year) / prev_year,
            ValueFormat::Percent,
        ),
    ]
}
