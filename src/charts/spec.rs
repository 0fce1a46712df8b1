//! Chart Spec Module
//! Typed chart configuration, created fresh for every render call.

use crate::data::ValueFormat;
use serde::{Deserialize, Serialize};

/// Supported chart shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Waterfall,
}

/// Configuration handed to the chart builders: which fields go on which
/// axis, how values are formatted, and what the chart is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_field: String,
    pub y_fields: Vec<String>,
    pub color_field: Option<String>,
    pub title: String,
    pub value_format: ValueFormat,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>, value_format: ValueFormat) -> Self {
        Self {
            kind,
            x_field: String::new(),
            y_fields: Vec::new(),
            color_field: None,
            title: title.into(),
            value_format,
        }
    }

    pub fn with_x(mut self, field: impl Into<String>) -> Self {
        self.x_field = field.into();
        self
    }

    pub fn with_y(mut self, fields: &[&str]) -> Self {
        self.y_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_color(mut self, field: impl Into<String>) -> Self {
        self.color_field = Some(field.into());
        self
    }
}
