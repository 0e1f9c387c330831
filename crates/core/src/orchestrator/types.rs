//! Types for the source orchestrator.

use serde::Serialize;

use crate::record::{IdKind, SourceRecord};

/// How one source worker ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Extraction completed; the record was kept.
    Succeeded,
    /// Terminal failure or retries exhausted.
    Failed { kind: String, attempts: u32 },
    /// Still running when the join budget ran out.
    Abandoned,
    /// The worker task panicked.
    Crashed,
    /// Configured, but no adapter is registered under this name.
    Unregistered,
    /// Succeeded, but dropped by identifier-kind correction.
    Superseded,
}

/// Collected records for one item, in source priority order.
#[derive(Debug, Clone, Default)]
pub struct SourceResults {
    records: Vec<(String, SourceRecord)>,
    statuses: Vec<(String, SourceStatus)>,
}

impl SourceResults {
    pub(crate) fn new(
        records: Vec<(String, SourceRecord)>,
        statuses: Vec<(String, SourceStatus)>,
    ) -> Self {
        Self { records, statuses }
    }

    /// Build results directly from records, e.g. for merging fixtures.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, SourceRecord)>,
        S: Into<String>,
    {
        let records: Vec<(String, SourceRecord)> =
            records.into_iter().map(|(n, r)| (n.into(), r)).collect();
        let statuses = records
            .iter()
            .map(|(n, _)| (n.clone(), SourceStatus::Succeeded))
            .collect();
        Self { records, statuses }
    }

    /// Successful records in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceRecord)> {
        self.records.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Mutable access for in-place normalization before a merge.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SourceRecord)> {
        self.records.iter_mut().map(|(n, r)| (n.as_str(), r))
    }

    /// Record produced by a named source.
    pub fn get(&self, name: &str) -> Option<&SourceRecord> {
        self.records
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Names of sources that produced a record, in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Final status of every configured source.
    pub fn statuses(&self) -> &[(String, SourceStatus)] {
        &self.statuses
    }

    /// Status of a named source.
    pub fn status(&self, name: &str) -> Option<&SourceStatus> {
        self.statuses
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A worker planned for one item.
#[derive(Debug, Clone)]
pub(crate) struct PlannedWorker {
    /// Bare source name.
    pub name: String,
    /// Identifier scheme this worker resolves.
    pub group: IdKind,
    /// Identifier handed to the adapter.
    pub seed: String,
}
