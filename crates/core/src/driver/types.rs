//! Driver collaborator contracts and notices.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::namer::NamingPlan;
use crate::reconciler::AggregationError;
use crate::record::{FinalRecord, Item};

/// Failure reported by a downstream consumer (file writer, image fetcher).
#[derive(Debug, Error)]
pub enum DownstreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cover fetch failed: {0}")]
    CoverFetch(String),

    #[error("{0}")]
    Other(String),
}

/// Why one item failed. Never fatal to the batch.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("downstream failed: {0}")]
    Downstream(#[from] DownstreamError),
}

impl ItemError {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ItemError::Aggregation(AggregationError::NoSuccessfulSource(_)) => "no_source",
            ItemError::Aggregation(AggregationError::MissingField { .. }) => "missing_field",
            ItemError::Downstream(_) => "downstream_failed",
        }
    }
}

/// Consumes a finished item: writes metadata files, fetches images.
#[async_trait]
pub trait Downstream: Send + Sync {
    async fn deliver(
        &self,
        item: &Item,
        record: &FinalRecord,
        plan: &NamingPlan,
    ) -> Result<(), DownstreamError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessNotice {
    pub id: String,
    pub title: String,
    pub save_dir: PathBuf,
    pub poster_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    pub id: String,
    pub message: String,
}

/// Tally for one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Identifiers of failed items, in processing order.
    pub failed_ids: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Receives per-item outcomes and the final tally.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn item_succeeded(&self, notice: &SuccessNotice);

    async fn item_failed(&self, notice: &FailureNotice);

    async fn batch_finished(&self, summary: &BatchSummary);
}
