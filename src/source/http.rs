use std::time::Duration;

use tracing::trace;

use crate::core::RawRecord;
use crate::error::{DashboardError, DashboardResult};

use super::{DataSource, records_from_json};

/// Fetches records from a JSON endpoint with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpJsonSource {
    client: reqwest::blocking::Client,
    url: String,
    timeout: Duration,
}

impl HttpJsonSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> DashboardResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Fetch(format!("reqwest client error: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_error(&self, err: reqwest::Error) -> DashboardError {
        if err.is_timeout() {
            DashboardError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            DashboardError::Fetch(format!("request to `{}` failed: {err}", self.url))
        }
    }
}

impl DataSource for HttpJsonSource {
    fn fetch(&mut self) -> DashboardResult<Vec<RawRecord>> {
        let payload: serde_json::Value = self
            .client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| self.map_error(e))?
            .json()
            .map_err(|e| self.map_error(e))?;
        let records = records_from_json(payload)?;
        trace!(url = %self.url, count = records.len(), "fetched json records");
        Ok(records)
    }
}
