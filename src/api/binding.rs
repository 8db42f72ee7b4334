use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{AxisPlan, Column, EnrichedRow, finite_max};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{DashboardFrame, PANEL_TOOLS, PanelFrame, Renderer, SeriesFrame};

use super::{
    BindingSnapshot, ChartId, ChartSnapshot, ChartSpec, ChartState, ChartUpdate, ColumnBuffer,
    DashboardConfig, ZoomWindow, dashboard_layout,
};

/// Summary of one applied rebind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebindReport {
    pub generation: u64,
    pub rows: usize,
    pub order_changed: bool,
    pub plans: [AxisPlan; 4],
}

impl RebindReport {
    #[must_use]
    pub fn plan(&self, chart: ChartId) -> AxisPlan {
        self.plans[chart.index()]
    }
}

/// Owns the shared column buffer, the four chart states and their shared
/// categorical order.
///
/// `rebind` is the only path that changes chart data. It computes every axis
/// and the new order before touching live state, so a failing refresh leaves
/// the previous state intact and a successful one is visible to the renderer
/// as one frame.
pub struct ChartBinding<R: Renderer> {
    renderer: R,
    config: DashboardConfig,
    buffer: ColumnBuffer,
    order: Arc<[String]>,
    charts: [ChartState; 4],
    generation: u64,
}

impl<R: Renderer> ChartBinding<R> {
    pub fn new(renderer: R, config: DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        let order: Arc<[String]> = Arc::from(Vec::new());
        let charts = dashboard_layout().map(|spec| ChartState::new(spec, Arc::clone(&order)));
        Ok(Self {
            renderer,
            config,
            buffer: ColumnBuffer::from_rows(&[]),
            order,
            charts,
            generation: 0,
        })
    }

    /// Replaces all chart data with `rows` and recomputes dependent axis state.
    pub fn rebind(&mut self, rows: &[EnrichedRow]) -> DashboardResult<RebindReport> {
        self.rebind_columns(ColumnBuffer::from_rows(rows))
    }

    /// Same as `rebind`, for hosts that already hold column-oriented data.
    ///
    /// Every dashboard column must be present and index-aligned.
    pub fn rebind_columns(&mut self, buffer: ColumnBuffer) -> DashboardResult<RebindReport> {
        buffer.validate()?;

        let items = buffer.items()?;
        let order_changed = *self.order != *items;
        let order = if order_changed {
            Arc::from(items)
        } else {
            Arc::clone(&self.order)
        };

        let mut updates = Vec::with_capacity(self.charts.len());
        let mut plans = [AxisPlan {
            max_value: 0.0,
            tick_step: 0.0,
        }; 4];
        for chart in &self.charts {
            let spec = chart.spec();
            let data_max = axis_data_max(&buffer, spec)?;
            let axis = spec
                .axis_policy
                .resolve(data_max, self.config.headroom_ratio);
            if !axis.range.end.is_finite() {
                return Err(DashboardError::InvalidData(format!(
                    "chart {:?} axis overflows for data max {data_max}",
                    spec.id
                )));
            }
            trace!(
                chart = ?spec.id,
                data_max,
                max_value = axis.plan.max_value,
                tick_step = axis.plan.tick_step,
                range_end = axis.range.end,
                "planned axis"
            );
            plans[spec.id.index()] = axis.plan;
            updates.push(ChartUpdate {
                axis,
                factors: Arc::clone(&order),
            });
        }

        // Nothing below can fail: the new state goes live as a whole.
        let rows = buffer.len();
        self.buffer = buffer;
        self.order = order;
        for (chart, update) in self.charts.iter_mut().zip(updates) {
            chart.commit(update);
        }
        self.generation += 1;
        debug!(
            generation = self.generation,
            rows,
            order_changed,
            "rebound chart data"
        );

        self.render()?;
        Ok(RebindReport {
            generation: self.generation,
            rows,
            order_changed,
            plans,
        })
    }

    /// Toggles a legend entry; returns the series' new visibility.
    pub fn toggle_legend(&mut self, chart: ChartId, column: Column) -> DashboardResult<bool> {
        let state = &mut self.charts[chart.index()];
        if !state.spec().legend_click_hides {
            return Err(DashboardError::InvalidData(format!(
                "chart {chart:?} has no interactive legend"
            )));
        }
        let visible = state.toggle_series(column)?;
        trace!(?chart, %column, visible, "toggled legend entry");
        self.render()?;
        Ok(visible)
    }

    pub fn set_zoom(&mut self, chart: ChartId, zoom: ZoomWindow) -> DashboardResult<()> {
        self.charts[chart.index()].set_zoom(zoom)?;
        trace!(?chart, ?zoom, "set zoom window");
        self.render()
    }

    pub fn reset_view(&mut self, chart: ChartId) -> DashboardResult<()> {
        self.charts[chart.index()].reset_view();
        trace!(?chart, "reset view");
        self.render()
    }

    #[must_use]
    pub fn chart(&self, chart: ChartId) -> &ChartState {
        &self.charts[chart.index()]
    }

    #[must_use]
    pub fn charts(&self) -> &[ChartState; 4] {
        &self.charts
    }

    #[must_use]
    pub fn buffer(&self) -> &ColumnBuffer {
        &self.buffer
    }

    /// Categorical order shared by every chart.
    #[must_use]
    pub fn order(&self) -> &Arc<[String]> {
        &self.order
    }

    /// Number of successful rebinds.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn snapshot(&self) -> BindingSnapshot {
        BindingSnapshot {
            buffer: self.buffer.clone(),
            charts: self
                .charts
                .iter()
                .map(|chart| ChartSnapshot {
                    chart: chart.id(),
                    plan: chart.axis().plan,
                    range: chart.axis().range,
                    ticks: chart.axis().ticks.clone(),
                    factors: chart.factors().to_vec(),
                    view: chart.view().clone(),
                })
                .collect(),
        }
    }

    /// Materializes the current state as one renderer frame.
    pub fn frame(&self) -> DashboardResult<DashboardFrame> {
        let panels = self
            .charts
            .iter()
            .map(|chart| self.panel_frame(chart))
            .collect::<DashboardResult<Vec<_>>>()?;
        Ok(DashboardFrame {
            title: self.config.title.clone(),
            generation: self.generation,
            grid: (2, 2),
            panels,
        })
    }

    fn panel_frame(&self, chart: &ChartState) -> DashboardResult<PanelFrame> {
        let view = chart.view_of(&self.buffer)?;
        let spec = chart.spec();
        let series = spec
            .series
            .iter()
            .zip(&view.series)
            .map(|(series, (column, values))| SeriesFrame {
                column: *column,
                legend: series.legend.clone(),
                color: series.color,
                bar_width: self.config.bar_width,
                visible: !chart.view().is_hidden(*column),
                values: values
                    .iter()
                    .map(|value| value.is_finite().then_some(*value))
                    .collect(),
            })
            .collect();

        Ok(PanelFrame {
            chart: spec.id,
            title: spec.title.clone(),
            grid_cell: spec.id.grid_cell(),
            height_px: self.config.panel_height_px,
            x_label_orientation_rad: self.config.x_label_orientation_rad,
            factors: chart.factors().to_vec(),
            y_range: chart.axis().range,
            visible_y_range: chart.visible_y_range(),
            x_zoom: chart.view().zoom.and_then(|zoom| zoom.x),
            ticks: chart.axis().ticks.clone(),
            series,
            tooltips: spec.tooltips.clone(),
            tools: PANEL_TOOLS.to_vec(),
        })
    }

    fn render(&mut self) -> DashboardResult<()> {
        let frame = self.frame()?;
        self.renderer.render(&frame)
    }
}

/// Largest finite value across every column plotted on the chart's axis.
fn axis_data_max(buffer: &ColumnBuffer, spec: &ChartSpec) -> DashboardResult<f64> {
    spec.axis_columns().try_fold(0.0_f64, |max, column| {
        let values = buffer.numbers(column)?;
        Ok(max.max(finite_max(values.iter().copied())))
    })
}
