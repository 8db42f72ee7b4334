use std::collections::VecDeque;

use crate::core::{RawRecord, Row};
use crate::error::{DashboardError, DashboardResult};

use super::DataSource;

/// Scripted in-memory source for tests and demos.
///
/// Queued responses are served in order; once the queue is drained the last
/// successful payload repeats.
#[derive(Debug, Default)]
pub struct MemorySource {
    queue: VecDeque<Result<Vec<RawRecord>, String>>,
    last: Option<Vec<RawRecord>>,
    fetches: usize,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source that always returns `rows`.
    #[must_use]
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut source = Self::new();
        source.push_rows(rows);
        source
    }

    pub fn push_records(&mut self, records: Vec<RawRecord>) {
        self.queue.push_back(Ok(records));
    }

    pub fn push_rows(&mut self, rows: &[Row]) {
        self.push_records(rows.iter().map(Row::to_record).collect());
    }

    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.queue.push_back(Err(message.into()));
    }

    /// Number of `fetch` calls served so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl DataSource for MemorySource {
    fn fetch(&mut self) -> DashboardResult<Vec<RawRecord>> {
        self.fetches += 1;
        match self.queue.pop_front() {
            Some(Ok(records)) => {
                self.last = Some(records.clone());
                Ok(records)
            }
            Some(Err(message)) => Err(DashboardError::Fetch(message)),
            None => self
                .last
                .clone()
                .ok_or_else(|| DashboardError::Fetch("memory source has no data".to_owned())),
        }
    }
}
