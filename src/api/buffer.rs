use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Column, EnrichedRow};
use crate::error::{DashboardError, DashboardResult};

/// Values of one buffer column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValues {
    Text(Vec<String>),
    Number(#[serde(with = "nan_as_null")] Vec<f64>),
}

impl ColumnValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Number(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Column-oriented data shared by every chart.
///
/// All columns are index-aligned: value `i` of every column belongs to item `i`.
/// The binding replaces the whole buffer on refresh; there is no patch path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnBuffer {
    columns: IndexMap<String, ColumnValues>,
}

impl ColumnBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full buffer, input and derived columns, from enriched rows.
    #[must_use]
    pub fn from_rows(rows: &[EnrichedRow]) -> Self {
        let mut columns = IndexMap::with_capacity(Column::ALL.len());
        for column in Column::ALL {
            let values = if column.is_categorical() {
                ColumnValues::Text(rows.iter().map(|row| row.item().to_owned()).collect())
            } else {
                ColumnValues::Number(rows.iter().filter_map(|row| row.numeric(column)).collect())
            };
            columns.insert(column.name().to_owned(), values);
        }
        trace!(rows = rows.len(), "built column buffer");
        Self { columns }
    }

    /// Inserts or replaces a column by name.
    pub fn insert(&mut self, name: impl Into<String>, values: ColumnValues) -> Option<ColumnValues> {
        self.columns.insert(name.into(), values)
    }

    pub fn remove(&mut self, name: &str) -> Option<ColumnValues> {
        self.columns.shift_remove(name)
    }

    /// Row count, taken from the item column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns
            .get(Column::Item.name())
            .map_or(0, ColumnValues::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnValues> {
        self.columns.get(name)
    }

    pub fn items(&self) -> DashboardResult<&[String]> {
        match self.require(Column::Item)? {
            ColumnValues::Text(values) => Ok(values),
            ColumnValues::Number(_) => Err(DashboardError::InvalidData(format!(
                "column `{}` must hold text",
                Column::Item
            ))),
        }
    }

    pub fn numbers(&self, column: Column) -> DashboardResult<&[f64]> {
        match self.require(column)? {
            ColumnValues::Number(values) => Ok(values),
            // An empty JSON array deserializes as text.
            ColumnValues::Text(values) if values.is_empty() => Ok(&[]),
            ColumnValues::Text(_) => Err(DashboardError::InvalidData(format!(
                "column `{column}` must hold numbers"
            ))),
        }
    }

    /// Checks every dashboard column is present, typed and index-aligned.
    pub fn validate(&self) -> DashboardResult<()> {
        let expected = self.items()?.len();
        for column in Column::ALL.into_iter().filter(|column| !column.is_categorical()) {
            let actual = self.numbers(column)?.len();
            if actual != expected {
                return Err(DashboardError::ColumnLength {
                    column: column.name().to_owned(),
                    expected,
                    actual,
                });
            }
        }
        // Extra host columns ride along but must stay aligned too.
        for (name, values) in &self.columns {
            if values.len() != expected {
                return Err(DashboardError::ColumnLength {
                    column: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }

    fn require(&self, column: Column) -> DashboardResult<&ColumnValues> {
        self.columns
            .get(column.name())
            .ok_or_else(|| DashboardError::MissingBufferColumn {
                column: column.name().to_owned(),
            })
    }
}

/// JSON has no NaN; undefined cells travel as `null`.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|value| value.is_finite().then_some(*value))
            .collect::<Vec<Option<f64>>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }
}
