//! Charts module - chart descriptions and their builders

mod builder;
mod spec;

pub use builder::{
    Bar, Chart, ChartBuilder, ChartContent, InvalidDataError, LinePoint, LineSeries, Rgb, Slice,
    Tile, SEGMENT_PALETTE,
};
pub use spec::{ChartKind, ChartSpec};
