pub mod columns;
pub mod metrics;
pub mod range;
pub mod schema;
pub mod types;

pub use columns::Column;
pub use metrics::{MarginPolicy, MetricDeriver};
pub use range::{
    AxisPlan, AxisPolicy, AxisRange, AxisState, finite_max, nice_range, percentage_range,
    tick_marks,
};
pub use schema::{row_from_record, rows_from_records};
pub use types::{EnrichedRow, RawRecord, Row};
