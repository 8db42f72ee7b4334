use serde::{Deserialize, Serialize};

use crate::api::{ChartId, TooltipField};
use crate::core::{AxisRange, Column};
use crate::error::{DashboardError, DashboardResult};
use crate::render::Color;

/// Interactive tools every panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelTool {
    Hover,
    Pan,
    BoxZoom,
    Reset,
}

pub const PANEL_TOOLS: [PanelTool; 4] = [
    PanelTool::Hover,
    PanelTool::Pan,
    PanelTool::BoxZoom,
    PanelTool::Reset,
];

/// One bar series ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFrame {
    pub column: Column,
    pub legend: Option<String>,
    pub color: Color,
    pub bar_width: f64,
    pub visible: bool,
    /// Index-aligned with the panel factors. `None` draws no bar.
    pub values: Vec<Option<f64>>,
}

/// One panel of the grid, fully materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelFrame {
    pub chart: ChartId,
    pub title: String,
    pub grid_cell: (usize, usize),
    pub height_px: u32,
    pub x_label_orientation_rad: f64,
    pub factors: Vec<String>,
    /// Range planned from the data.
    pub y_range: AxisRange,
    /// Range on screen; differs from `y_range` while zoomed.
    pub visible_y_range: AxisRange,
    pub x_zoom: Option<AxisRange>,
    pub ticks: Vec<f64>,
    pub series: Vec<SeriesFrame>,
    pub tooltips: Vec<TooltipField>,
    pub tools: Vec<PanelTool>,
}

/// Backend-agnostic scene for one dashboard commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrame {
    pub title: String,
    pub generation: u64,
    pub grid: (usize, usize),
    pub panels: Vec<PanelFrame>,
}

impl DashboardFrame {
    #[must_use]
    pub fn panel(&self, chart: ChartId) -> Option<&PanelFrame> {
        self.panels.iter().find(|panel| panel.chart == chart)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(|panel| panel.factors.is_empty())
    }

    pub fn validate(&self) -> DashboardResult<()> {
        let (rows, columns) = self.grid;
        if self.panels.len() > rows * columns {
            return Err(DashboardError::InvalidData(format!(
                "{} panels do not fit a {rows}x{columns} grid",
                self.panels.len()
            )));
        }
        let factors = self.panels.first().map(|panel| &panel.factors);
        for panel in &self.panels {
            if Some(&panel.factors) != factors {
                return Err(DashboardError::InvalidData(format!(
                    "panel {:?} categorical order diverges from the grid",
                    panel.chart
                )));
            }
            panel.validate()?;
        }
        Ok(())
    }
}

impl PanelFrame {
    pub fn validate(&self) -> DashboardResult<()> {
        for (label, range) in [("y", self.y_range), ("visible y", self.visible_y_range)] {
            if !range.start.is_finite() || !range.end.is_finite() || range.end <= range.start {
                return Err(DashboardError::InvalidData(format!(
                    "panel {:?} {label} range must be finite with end > start",
                    self.chart
                )));
            }
        }
        if self.ticks.iter().any(|tick| !tick.is_finite()) {
            return Err(DashboardError::InvalidData(format!(
                "panel {:?} ticks must be finite",
                self.chart
            )));
        }
        for series in &self.series {
            series.color.validate()?;
            if series.values.len() != self.factors.len() {
                return Err(DashboardError::ColumnLength {
                    column: series.column.name().to_owned(),
                    expected: self.factors.len(),
                    actual: series.values.len(),
                });
            }
            if !series.bar_width.is_finite() || series.bar_width <= 0.0 {
                return Err(DashboardError::InvalidData(
                    "bar width must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
