use serde::{Deserialize, Serialize};

use crate::core::{AxisPlan, AxisRange};

use super::{ChartId, ColumnBuffer, ViewState};

/// Serializable state of one chart, used by regression tests and debugging tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub chart: ChartId,
    pub plan: AxisPlan,
    pub range: AxisRange,
    pub ticks: Vec<f64>,
    pub factors: Vec<String>,
    pub view: ViewState,
}

/// Deterministic snapshot of everything a rebind derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSnapshot {
    pub buffer: ColumnBuffer,
    pub charts: Vec<ChartSnapshot>,
}

impl BindingSnapshot {
    #[must_use]
    pub fn chart(&self, chart: ChartId) -> Option<&ChartSnapshot> {
        self.charts.iter().find(|snapshot| snapshot.chart == chart)
    }
}
