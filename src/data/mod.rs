//! Data module - dataset shapes and the sample data provider

mod model;
mod provider;

pub use model::{
    amounts_reconcile, BridgeStep, ForecastPoint, ForecastSeries, Kpi, ModelError, MovementBridge,
    SegmentBreakdown, ValueFormat, RECONCILE_TOLERANCE,
};
pub use provider::SampleData;
