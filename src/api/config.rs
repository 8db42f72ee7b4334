use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::MarginPolicy;
use crate::error::{DashboardError, DashboardResult};

/// Public dashboard bootstrap configuration.
///
/// Serializable so hosts can keep it next to their data-source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Multiplier applied to planned maxima on non-percentage axes.
    #[serde(default = "default_headroom_ratio")]
    pub headroom_ratio: f64,
    #[serde(default)]
    pub margin_policy: MarginPolicy,
    #[serde(default = "default_panel_height_px")]
    pub panel_height_px: u32,
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default = "default_x_label_orientation_rad")]
    pub x_label_orientation_rad: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            refresh_interval_ms: default_refresh_interval_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            headroom_ratio: default_headroom_ratio(),
            margin_policy: MarginPolicy::default(),
            panel_height_px: default_panel_height_px(),
            bar_width: default_bar_width(),
            x_label_orientation_rad: default_x_label_orientation_rad(),
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval_ms = duration_ms(interval);
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = duration_ms(timeout);
        self
    }

    #[must_use]
    pub fn with_headroom_ratio(mut self, ratio: f64) -> Self {
        self.headroom_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_margin_policy(mut self, policy: MarginPolicy) -> Self {
        self.margin_policy = policy;
        self
    }

    #[must_use]
    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.bar_width = bar_width;
        self
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.refresh_interval_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "refresh interval must be > 0".to_owned(),
            ));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "fetch timeout must be > 0".to_owned(),
            ));
        }
        if !self.headroom_ratio.is_finite() || self.headroom_ratio < 1.0 {
            return Err(DashboardError::InvalidConfig(
                "headroom ratio must be finite and >= 1".to_owned(),
            ));
        }
        if self.panel_height_px == 0 {
            return Err(DashboardError::InvalidConfig(
                "panel height must be > 0".to_owned(),
            ));
        }
        if !self.bar_width.is_finite() || self.bar_width <= 0.0 || self.bar_width > 1.0 {
            return Err(DashboardError::InvalidConfig(
                "bar width must be finite and in (0, 1]".to_owned(),
            ));
        }
        if !self.x_label_orientation_rad.is_finite() {
            return Err(DashboardError::InvalidConfig(
                "x label orientation must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON config; absent fields take defaults.
    pub fn from_json_str(input: &str) -> DashboardResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| DashboardError::InvalidConfig(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::InvalidConfig(format!("failed to serialize config: {e}")))
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn default_title() -> String {
    "Live Resell Dashboard".to_owned()
}

fn default_refresh_interval_ms() -> u64 {
    30_000
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_headroom_ratio() -> f64 {
    1.05
}

fn default_panel_height_px() -> u32 {
    350
}

fn default_bar_width() -> f64 {
    0.4
}

fn default_x_label_orientation_rad() -> f64 {
    1.0
}
