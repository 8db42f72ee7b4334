mod binding;
mod buffer;
mod chart_state;
mod config;
mod json_contract;
mod layout;
mod refresh;
mod snapshot;

pub use binding::{ChartBinding, RebindReport};
pub use buffer::{ColumnBuffer, ColumnValues};
pub use chart_state::{ChartState, ChartUpdate, ChartView, ViewState, ZoomWindow};
pub use config::DashboardConfig;
pub use json_contract::{BINDING_SNAPSHOT_JSON_SCHEMA_V1, BindingSnapshotJsonContractV1};
pub use layout::{ChartId, ChartSpec, SeriesSpec, TooltipField, dashboard_layout};
pub use refresh::{RefreshOutcome, RefreshScheduler, RefreshStats, SharedRefresh};
pub use snapshot::{BindingSnapshot, ChartSnapshot};
