use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AxisRange, AxisState, Column};
use crate::error::{DashboardError, DashboardResult};

use super::{ChartId, ChartSpec, ColumnBuffer};

/// User-driven view state. Refreshes never touch it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub hidden_series: SmallVec<[Column; 2]>,
    pub zoom: Option<ZoomWindow>,
}

impl ViewState {
    #[must_use]
    pub fn is_hidden(&self, column: Column) -> bool {
        self.hidden_series.contains(&column)
    }
}

/// Box-zoom window. `x` is in categorical coordinates (`0..item_count`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
}

impl ZoomWindow {
    pub fn validate(self) -> DashboardResult<Self> {
        for (axis, range) in [("x", self.x), ("y", self.y)] {
            let Some(range) = range else { continue };
            if !range.start.is_finite() || !range.end.is_finite() || range.span() <= 0.0 {
                return Err(DashboardError::InvalidData(format!(
                    "zoom {axis} range must be finite with end > start"
                )));
            }
        }
        Ok(self)
    }
}

/// Everything a refresh changes on one chart, applied in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartUpdate {
    pub axis: AxisState,
    pub factors: Arc<[String]>,
}

/// Live state of one panel.
#[derive(Debug, Clone)]
pub struct ChartState {
    spec: ChartSpec,
    axis: AxisState,
    factors: Arc<[String]>,
    view: ViewState,
    revision: u64,
}

impl ChartState {
    #[must_use]
    pub fn new(spec: ChartSpec, factors: Arc<[String]>) -> Self {
        Self {
            spec,
            axis: AxisState::default(),
            factors,
            view: ViewState::default(),
            revision: 0,
        }
    }

    /// The only write path for refresh-owned state.
    pub fn commit(&mut self, update: ChartUpdate) {
        self.axis = update.axis;
        self.factors = update.factors;
        self.revision += 1;
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.spec.id
    }

    #[must_use]
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[must_use]
    pub fn axis(&self) -> &AxisState {
        &self.axis
    }

    /// Categorical order, shared with the other panels.
    #[must_use]
    pub fn factors(&self) -> &Arc<[String]> {
        &self.factors
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Number of commits applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Range actually shown: the zoom window when set, the planned range otherwise.
    #[must_use]
    pub fn visible_y_range(&self) -> AxisRange {
        self.view
            .zoom
            .and_then(|zoom| zoom.y)
            .unwrap_or(self.axis.range)
    }

    /// Flips visibility of one series; returns the new visibility.
    pub fn toggle_series(&mut self, column: Column) -> DashboardResult<bool> {
        if !self.spec.plots(column) {
            return Err(DashboardError::InvalidData(format!(
                "chart {:?} has no `{column}` series",
                self.spec.id
            )));
        }
        if let Some(index) = self.view.hidden_series.iter().position(|c| *c == column) {
            self.view.hidden_series.remove(index);
            Ok(true)
        } else {
            self.view.hidden_series.push(column);
            Ok(false)
        }
    }

    pub fn set_zoom(&mut self, zoom: ZoomWindow) -> DashboardResult<()> {
        self.view.zoom = Some(zoom.validate()?);
        Ok(())
    }

    pub fn reset_view(&mut self) {
        self.view = ViewState::default();
    }

    /// Read-only view of the buffer restricted to the fields this chart plots.
    pub fn view_of<'a>(&self, buffer: &'a ColumnBuffer) -> DashboardResult<ChartView<'a>> {
        let series = self
            .spec
            .axis_columns()
            .map(|column| buffer.numbers(column).map(|values| (column, values)))
            .collect::<DashboardResult<SmallVec<[(Column, &'a [f64]); 2]>>>()?;
        Ok(ChartView {
            chart: self.spec.id,
            items: buffer.items()?,
            series,
        })
    }
}

/// Borrowed slice of the shared buffer for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView<'a> {
    pub chart: ChartId,
    pub items: &'a [String],
    pub series: SmallVec<[(Column, &'a [f64]); 2]>,
}
