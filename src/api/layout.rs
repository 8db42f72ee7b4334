use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::{AxisPolicy, Column};
use crate::render::Color;

/// One of the four dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartId {
    Revenue,
    ProfitMargin,
    TotalProfit,
    UnitsSold,
}

impl ChartId {
    /// Row-major grid order.
    pub const ALL: [Self; 4] = [
        Self::Revenue,
        Self::ProfitMargin,
        Self::TotalProfit,
        Self::UnitsSold,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Revenue => 0,
            Self::ProfitMargin => 1,
            Self::TotalProfit => 2,
            Self::UnitsSold => 3,
        }
    }

    /// `(row, column)` of the panel in the 2x2 grid.
    #[must_use]
    pub const fn grid_cell(self) -> (usize, usize) {
        (self.index() / 2, self.index() % 2)
    }
}

/// Hover tooltip line: label plus the column it reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipField {
    pub label: String,
    pub column: Column,
    /// Display pattern understood by the widget layer, e.g. `0.00`.
    pub format: Option<String>,
}

impl TooltipField {
    fn item() -> Self {
        Self {
            label: Column::Item.name().to_owned(),
            column: Column::Item,
            format: None,
        }
    }

    fn amount(label: &str, column: Column) -> Self {
        Self {
            label: label.to_owned(),
            column,
            format: Some("0.00".to_owned()),
        }
    }
}

/// One bar series inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub column: Column,
    pub legend: Option<String>,
    pub color: Color,
}

impl SeriesSpec {
    fn new(column: Column, color: Color) -> Self {
        Self {
            column,
            legend: None,
            color,
        }
    }

    fn with_legend(mut self, legend: &str) -> Self {
        self.legend = Some(legend.to_owned());
        self
    }
}

/// Declarative panel description. Fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    pub axis_policy: AxisPolicy,
    pub series: SmallVec<[SeriesSpec; 2]>,
    pub tooltips: Vec<TooltipField>,
    /// Clicking a legend entry hides its series.
    pub legend_click_hides: bool,
}

impl ChartSpec {
    /// Columns whose maxima drive the y axis; every plotted series shares it.
    pub fn axis_columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.series.iter().map(|series| series.column)
    }

    #[must_use]
    pub fn plots(&self, column: Column) -> bool {
        self.series.iter().any(|series| series.column == column)
    }

    fn single(id: ChartId, column: Column, color: Color, axis_policy: AxisPolicy) -> Self {
        Self {
            id,
            title: column.name().to_owned(),
            axis_policy,
            series: smallvec![SeriesSpec::new(column, color)],
            tooltips: vec![TooltipField::item(), TooltipField::amount(column.name(), column)],
            legend_click_hides: false,
        }
    }
}

/// The four dashboard panels in grid order.
#[must_use]
pub fn dashboard_layout() -> [ChartSpec; 4] {
    let revenue = ChartSpec {
        id: ChartId::Revenue,
        title: "Revenue".to_owned(),
        axis_policy: AxisPolicy::Nice,
        series: smallvec![
            SeriesSpec::new(Column::Revenue, Color::CYAN).with_legend("Revenue"),
            SeriesSpec::new(Column::ProjectedRevenue, Color::ORANGE.with_alpha(0.5))
                .with_legend("Projected Revenue"),
        ],
        tooltips: vec![
            TooltipField::item(),
            TooltipField::amount("Revenue", Column::Revenue),
            TooltipField::amount("Projected Revenue", Column::ProjectedRevenue),
        ],
        legend_click_hides: true,
    };

    [
        revenue,
        ChartSpec::single(
            ChartId::ProfitMargin,
            Column::ProfitMarginPct,
            Color::LIME,
            AxisPolicy::Percentage,
        ),
        ChartSpec::single(
            ChartId::TotalProfit,
            Column::TotalProfit,
            Color::MAGENTA,
            AxisPolicy::Nice,
        ),
        ChartSpec::single(
            ChartId::UnitsSold,
            Column::UnitsSold,
            Color::DEEP_SKY_BLUE,
            AxisPolicy::Nice,
        ),
    ]
}
