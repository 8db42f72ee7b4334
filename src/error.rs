use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("missing column `{column}` in record {row}")]
    MissingColumn { column: String, row: usize },

    #[error("invalid value for column `{column}` in record {row}: {reason}")]
    InvalidCell {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("buffer is missing column `{column}`")]
    MissingBufferColumn { column: String },

    #[error("buffer column `{column}` has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate item key `{item}`")]
    DuplicateItem { item: String },

    #[error("selling price is zero for item `{item}`; profit margin is undefined")]
    ZeroSellingPrice { item: String },

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("fetch timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("render failed: {0}")]
    Render(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DashboardError {
    /// Returns `true` for failures local to one fetch that the next tick may recover from.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Timeout { .. })
    }
}
