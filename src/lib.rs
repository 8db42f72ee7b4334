//! resell-dashboard: refresh pipeline for a live resell dashboard.
//!
//! Raw sheet records are validated into typed rows, enriched with profit and
//! revenue metrics, planned onto "nice" axes and committed to four bar charts
//! that share one column buffer and one categorical order.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod source;
pub mod telemetry;

pub use api::{ChartBinding, DashboardConfig, RefreshScheduler};
pub use error::{DashboardError, DashboardResult};
