use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Column;

/// One source record: column name to raw cell value, in source column order.
pub type RawRecord = IndexMap<String, serde_json::Value>;

/// One item as read from the source, after schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub item: String,
    pub base_price: f64,
    pub selling_price: f64,
    pub units_sold: f64,
    pub people_interested: f64,
}

impl Row {
    #[must_use]
    pub fn new(
        item: impl Into<String>,
        base_price: f64,
        selling_price: f64,
        units_sold: f64,
        people_interested: f64,
    ) -> Self {
        Self {
            item: item.into(),
            base_price,
            selling_price,
            units_sold,
            people_interested,
        }
    }

    /// Source-shaped record carrying the five input columns.
    #[must_use]
    pub fn to_record(&self) -> RawRecord {
        [
            (Column::Item, serde_json::Value::from(self.item.as_str())),
            (Column::BasePrice, serde_json::Value::from(self.base_price)),
            (Column::SellingPrice, serde_json::Value::from(self.selling_price)),
            (Column::UnitsSold, serde_json::Value::from(self.units_sold)),
            (
                Column::PeopleInterested,
                serde_json::Value::from(self.people_interested),
            ),
        ]
        .into_iter()
        .map(|(column, value)| (column.name().to_owned(), value))
        .collect()
    }
}

/// Row plus the financial fields derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub row: Row,
    pub profit_per_item: f64,
    pub total_profit: f64,
    /// `NaN` when the selling price is zero.
    pub profit_margin_pct: f64,
    pub revenue: f64,
    pub projected_revenue: f64,
    pub projected_profit: f64,
}

impl EnrichedRow {
    #[must_use]
    pub fn item(&self) -> &str {
        &self.row.item
    }

    /// Numeric value of `column`, `None` for the categorical item column.
    #[must_use]
    pub fn numeric(&self, column: Column) -> Option<f64> {
        let value = match column {
            Column::Item => return None,
            Column::BasePrice => self.row.base_price,
            Column::SellingPrice => self.row.selling_price,
            Column::UnitsSold => self.row.units_sold,
            Column::PeopleInterested => self.row.people_interested,
            Column::ProfitPerItem => self.profit_per_item,
            Column::TotalProfit => self.total_profit,
            Column::ProfitMarginPct => self.profit_margin_pct,
            Column::Revenue => self.revenue,
            Column::ProjectedRevenue => self.projected_revenue,
            Column::ProjectedProfit => self.projected_profit,
        };
        Some(value)
    }
}
