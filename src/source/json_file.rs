use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::core::RawRecord;
use crate::error::{DashboardError, DashboardResult};

use super::{DataSource, records_from_json};

/// Re-reads a JSON export of the sheet on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for JsonFileSource {
    fn fetch(&mut self) -> DashboardResult<Vec<RawRecord>> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            DashboardError::Fetch(format!("failed to read `{}`: {e}", self.path.display()))
        })?;
        // A half-written export is a transient fetch failure, not a schema error.
        let payload = serde_json::from_str(&raw).map_err(|e| {
            DashboardError::Fetch(format!("invalid json in `{}`: {e}", self.path.display()))
        })?;
        let records = records_from_json(payload)?;
        trace!(path = %self.path.display(), count = records.len(), "read json records");
        Ok(records)
    }
}
