use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Column, EnrichedRow, Row};
use crate::error::{DashboardError, DashboardResult};

/// What to do with the profit margin of a row whose selling price is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MarginPolicy {
    /// Store `NaN`; charts show no bar and JSON carries `null`.
    #[default]
    Nan,
    /// Fail the whole refresh cycle.
    RejectRow,
}

/// Pure transform from source rows to rows with derived financial fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricDeriver {
    margin_policy: MarginPolicy,
}

impl MetricDeriver {
    #[must_use]
    pub const fn new(margin_policy: MarginPolicy) -> Self {
        Self { margin_policy }
    }

    #[must_use]
    pub const fn margin_policy(self) -> MarginPolicy {
        self.margin_policy
    }

    /// Derives every row, keeping source order.
    pub fn derive(self, rows: Vec<Row>) -> DashboardResult<Vec<EnrichedRow>> {
        let enriched = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| self.derive_row(index, row))
            .collect::<DashboardResult<Vec<_>>>()?;
        debug!(count = enriched.len(), "derived row metrics");
        Ok(enriched)
    }

    /// Derives one row. `index` is only used in error messages.
    ///
    /// Fails when a product overflows; only an undefined margin may be non-finite.
    pub fn derive_row(self, index: usize, row: Row) -> DashboardResult<EnrichedRow> {
        let profit_per_item = row.selling_price - row.base_price;
        let total_profit = profit_per_item * row.units_sold;
        let profit_margin_pct = if row.selling_price == 0.0 {
            match self.margin_policy {
                MarginPolicy::Nan => {
                    warn!(item = %row.item, "zero selling price; profit margin left undefined");
                    f64::NAN
                }
                MarginPolicy::RejectRow => {
                    return Err(DashboardError::ZeroSellingPrice { item: row.item });
                }
            }
        } else {
            profit_per_item / row.selling_price * 100.0
        };
        let revenue = row.selling_price * row.units_sold;
        let projected_revenue = row.selling_price * row.people_interested;
        let projected_profit = profit_per_item * row.people_interested;

        for (column, value) in [
            (Column::ProfitPerItem, profit_per_item),
            (Column::TotalProfit, total_profit),
            (Column::Revenue, revenue),
            (Column::ProjectedRevenue, projected_revenue),
            (Column::ProjectedProfit, projected_profit),
        ] {
            if !value.is_finite() {
                return Err(overflow(index, column));
            }
        }
        if profit_margin_pct.is_infinite() {
            return Err(overflow(index, Column::ProfitMarginPct));
        }

        Ok(EnrichedRow {
            row,
            profit_per_item,
            total_profit,
            profit_margin_pct,
            revenue,
            projected_revenue,
            projected_profit,
        })
    }
}

fn overflow(row: usize, column: Column) -> DashboardError {
    DashboardError::InvalidCell {
        row,
        column: column.name().to_owned(),
        reason: "derived value overflows f64".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{MarginPolicy, MetricDeriver};
    use crate::core::Row;
    use crate::error::DashboardError;

    #[test]
    fn derives_all_six_fields() {
        let enriched = MetricDeriver::default()
            .derive_row(0, Row::new("Lamp", 10.0, 15.0, 3.0, 5.0))
            .expect("derive");
        assert_eq!(enriched.profit_per_item, 5.0);
        assert_eq!(enriched.total_profit, 15.0);
        assert_relative_eq!(enriched.profit_margin_pct, 100.0 / 3.0, epsilon = 1e-9);
        assert_eq!(enriched.revenue, 45.0);
        assert_eq!(enriched.projected_revenue, 75.0);
        assert_eq!(enriched.projected_profit, 25.0);
    }

    #[test]
    fn zero_selling_price_yields_nan_margin_by_default() {
        let enriched = MetricDeriver::default()
            .derive_row(0, Row::new("Free sample", 2.0, 0.0, 4.0, 9.0))
            .expect("derive");
        assert!(enriched.profit_margin_pct.is_nan());
        assert_eq!(enriched.profit_per_item, -2.0);
        assert_eq!(enriched.total_profit, -8.0);
        assert_eq!(enriched.revenue, 0.0);
    }

    #[test]
    fn reject_policy_fails_on_zero_selling_price() {
        let err = MetricDeriver::new(MarginPolicy::RejectRow)
            .derive(vec![
                Row::new("A", 1.0, 2.0, 1.0, 1.0),
                Row::new("B", 1.0, 0.0, 1.0, 1.0),
            ])
            .expect_err("reject");
        assert!(matches!(err, DashboardError::ZeroSellingPrice { item } if item == "B"));
    }

    #[test]
    fn overflowing_product_is_rejected_with_record_index() {
        let err = MetricDeriver::default()
            .derive(vec![
                Row::new("A", 1.0, 2.0, 1.0, 1.0),
                Row::new("B", 1.0, 1e200, 1e200, 0.0),
            ])
            .expect_err("revenue overflows");
        assert!(matches!(
            err,
            DashboardError::InvalidCell { row: 1, ref column, .. } if column == "Revenue"
        ));
    }

    #[test]
    fn derive_keeps_source_order() {
        let enriched = MetricDeriver::default()
            .derive(vec![
                Row::new("z", 1.0, 2.0, 1.0, 1.0),
                Row::new("a", 1.0, 2.0, 1.0, 1.0),
                Row::new("m", 1.0, 2.0, 1.0, 1.0),
            ])
            .expect("derive");
        let items: Vec<&str> = enriched.iter().map(|row| row.item()).collect();
        assert_eq!(items, vec!["z", "a", "m"]);
    }
}
