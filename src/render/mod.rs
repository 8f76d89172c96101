//! Chart rendering: static SVG artifacts and HTML reports

mod html;
mod scale;
mod svg;

use std::path::Path;

use log::debug;

use crate::error::{Result, TabError};
use crate::model::Table;

pub use html::render_html_report;
pub use scale::{format_tick, nice_step, LinearScale};
pub use svg::render_svg;

/// Kind of chart to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Scatter,
    Line,
    Bar,
    Heatmap,
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scatter" => Ok(ChartKind::Scatter),
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "heatmap" => Ok(ChartKind::Heatmap),
            _ => Err(format!("unknown chart kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Scatter => write!(f, "scatter"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Heatmap => write!(f, "heatmap"),
        }
    }
}

/// Everything needed to draw one chart from a table
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Column for the x axis
    pub x: String,
    /// Column for the y axis (scatter, line, bar: values; heatmap: rows)
    pub y: Option<String>,
    /// Value column for heatmap cells
    pub value: Option<String>,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, x: impl Into<String>) -> Self {
        Self {
            kind,
            x: x.into(),
            y: None,
            value: None,
            title: None,
            x_label: None,
            y_label: None,
            width: 800,
            height: 500,
        }
    }

    pub fn with_y(mut self, y: impl Into<String>) -> Self {
        self.y = Some(y.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_labels(
        mut self,
        x_label: Option<String>,
        y_label: Option<String>,
    ) -> Self {
        self.x_label = x_label;
        self.y_label = y_label;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// The y column, required by every chart kind
    pub(crate) fn require_y(&self) -> Result<&str> {
        self.y
            .as_deref()
            .ok_or_else(|| TabError::render(format!("{} chart requires a y column", self.kind)))
    }
}

/// Render a chart to an SVG file on disk
pub fn render_to_file(table: &Table, spec: &ChartSpec, path: &Path) -> Result<()> {
    let svg = render_svg(table, spec)?;
    std::fs::write(path, svg)?;
    debug!("wrote {} chart to {}", spec.kind, path.display());
    Ok(())
}
