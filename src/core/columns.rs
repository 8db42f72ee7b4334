use serde::{Deserialize, Serialize};

/// Named column of the dashboard buffer.
///
/// The first five are the external input contract; the rest are derived
/// every refresh and never read back from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Item,
    BasePrice,
    SellingPrice,
    UnitsSold,
    PeopleInterested,
    ProfitPerItem,
    TotalProfit,
    ProfitMarginPct,
    Revenue,
    ProjectedRevenue,
    ProjectedProfit,
}

impl Column {
    /// Columns every source record must carry.
    pub const INPUT: [Self; 5] = [
        Self::Item,
        Self::BasePrice,
        Self::SellingPrice,
        Self::UnitsSold,
        Self::PeopleInterested,
    ];

    /// Buffer column order: input columns followed by derived ones.
    pub const ALL: [Self; 11] = [
        Self::Item,
        Self::BasePrice,
        Self::SellingPrice,
        Self::UnitsSold,
        Self::PeopleInterested,
        Self::ProfitPerItem,
        Self::TotalProfit,
        Self::ProfitMarginPct,
        Self::Revenue,
        Self::ProjectedRevenue,
        Self::ProjectedProfit,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::BasePrice => "Base Price",
            Self::SellingPrice => "Selling Price",
            Self::UnitsSold => "Units Sold",
            Self::PeopleInterested => "People Interested",
            Self::ProfitPerItem => "Profit per Item",
            Self::TotalProfit => "Total Profit",
            Self::ProfitMarginPct => "Profit Margin (%)",
            Self::Revenue => "Revenue",
            Self::ProjectedRevenue => "Projected Revenue",
            Self::ProjectedProfit => "Projected Profit",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.name() == name)
    }

    #[must_use]
    pub const fn is_categorical(self) -> bool {
        matches!(self, Self::Item)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
