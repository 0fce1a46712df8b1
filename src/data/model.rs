//! Data Model Module
//! Core dataset shapes: forecast series, segment breakdown, movement bridge, KPIs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Relative tolerance used when checking that amounts reconcile.
pub const RECONCILE_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("forecast periods must be strictly increasing ({prev} then {next})")]
    UnorderedPeriods { prev: NaiveDate, next: NaiveDate },
}

/// One period of the forecast: actual vs target ARR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: NaiveDate,
    pub actual: f64,
    pub target: f64,
}

/// Ordered ARR time series. Periods are strictly increasing, enforced at
/// construction so downstream code never has to re-sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Build a series, rejecting out-of-order or duplicate periods.
    pub fn from_points(points: Vec<ForecastPoint>) -> Result<Self, ModelError> {
        for pair in points.windows(2) {
            if pair[1].period <= pair[0].period {
                return Err(ModelError::UnorderedPeriods {
                    prev: pair[0].period,
                    next: pair[1].period,
                });
            }
        }
        Ok(Self { points })
    }

    /// Construction path for callers that already guarantee ordering
    /// (the sample data generator emits periods in ascending order).
    pub(crate) fn from_points_unchecked(points: Vec<ForecastPoint>) -> Self {
        debug_assert!(points.windows(2).all(|p| p[0].period < p[1].period));
        Self { points }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_period(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.period)
    }

    pub fn last_period(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.period)
    }

    /// Keep only the periods inside `[from, to]`, both endpoints included.
    pub fn clamp_to(&self, from: NaiveDate, to: NaiveDate) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| p.period >= from && p.period <= to)
            .copied()
            .collect();
        Self::from_points_unchecked(points)
    }
}

/// Revenue per customer segment. Segment names are unique by construction
/// (map keys) and iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SegmentBreakdown {
    pub segments: BTreeMap<String, f64>,
}

impl SegmentBreakdown {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            segments: pairs.into_iter().collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.segments.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the segment revenues sum to `total_arr` within the
    /// reconciliation tolerance.
    pub fn reconciles_with(&self, total_arr: f64) -> bool {
        amounts_reconcile(self.total(), total_arr)
    }
}

/// One step of the ARR movement waterfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStep {
    pub label: String,
    pub delta: f64,
}

impl BridgeStep {
    pub fn new(label: impl Into<String>, delta: f64) -> Self {
        Self {
            label: label.into(),
            delta,
        }
    }
}

/// Ordered waterfall from starting ARR to ending ARR. The first step carries
/// the absolute starting value, the last the stated ending value, and the
/// steps in between are signed movements (new business, expansion, churn).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MovementBridge {
    pub steps: Vec<BridgeStep>,
}

impl MovementBridge {
    pub fn new(steps: Vec<BridgeStep>) -> Self {
        Self { steps }
    }
}

/// Display format for an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFormat {
    Currency,
    Percent,
    Number,
}

impl ValueFormat {
    /// Render a value the way the dashboard shows it ("$1,234,567",
    /// "12.3%", "1,234").
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Currency => {
                let rounded = value.abs().round();
                let sign = if value < 0.0 { "-" } else { "" };
                format!("{}${}", sign, group_thousands(rounded))
            }
            ValueFormat::Percent => format!("{:.1}%", value * 100.0),
            ValueFormat::Number => group_thousands(value.round()),
        }
    }
}

/// A single summary metric shown as a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    pub format: ValueFormat,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: f64, format: ValueFormat) -> Self {
        Self {
            label: label.into(),
            value,
            format,
        }
    }
}

/// Relative comparison with an absolute floor so values near zero still
/// compare sanely.
pub fn amounts_reconcile(computed: f64, stated: f64) -> bool {
    let scale = computed.abs().max(stated.abs()).max(1.0);
    (computed - stated).abs() <= RECONCILE_TOLERANCE * scale
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(y: i32, m: u32, d: u32, actual: f64) -> ForecastPoint {
        ForecastPoint {
            period: date(y, m, d),
            actual,
            target: actual,
        }
    }

    #[test]
    fn series_rejects_duplicate_periods() {
        let result = ForecastSeries::from_points(vec![
            point(2024, 3, 31, 100.0),
            point(2024, 3, 31, 110.0),
        ]);
        assert!(matches!(
            result,
            Err(ModelError::UnorderedPeriods { .. })
        ));
    }

    #[test]
    fn series_rejects_out_of_order_periods() {
        let result = ForecastSeries::from_points(vec![
            point(2024, 6, 30, 100.0),
            point(2024, 3, 31, 110.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn clamp_includes_both_endpoints() {
        let series = ForecastSeries::from_points(vec![
            point(2024, 3, 31, 1.0),
            point(2024, 6, 30, 2.0),
            point(2024, 9, 30, 3.0),
            point(2024, 12, 31, 4.0),
        ])
        .unwrap();

        let clamped = series.clamp_to(date(2024, 6, 30), date(2024, 9, 30));
        let periods: Vec<NaiveDate> = clamped.points().iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![date(2024, 6, 30), date(2024, 9, 30)]);
    }

    #[test]
    fn clamp_to_empty_window() {
        let series =
            ForecastSeries::from_points(vec![point(2024, 3, 31, 1.0)]).unwrap();
        let clamped = series.clamp_to(date(2025, 1, 1), date(2025, 12, 31));
        assert!(clamped.is_empty());
    }

    #[test]
    fn breakdown_reconciles_within_tolerance() {
        let breakdown = SegmentBreakdown::from_pairs([
            ("Enterprise".to_string(), 600_000.0),
            ("SMB".to_string(), 400_000.0),
        ]);
        assert!(breakdown.reconciles_with(1_000_000.0));
        assert!(!breakdown.reconciles_with(1_010_000.0));
    }

    #[test]
    fn currency_format_groups_thousands() {
        assert_eq!(ValueFormat::Currency.format(1_234_567.0), "$1,234,567");
        assert_eq!(ValueFormat::Currency.format(-60_000.0), "-$60,000");
        assert_eq!(ValueFormat::Currency.format(999.4), "$999");
    }

    #[test]
    fn percent_format_scales_fraction() {
        assert_eq!(ValueFormat::Percent.format(0.153), "15.3%");
        assert_eq!(ValueFormat::Percent.format(-0.05), "-5.0%");
    }
}
