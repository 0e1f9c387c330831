//! Mock notifier for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::driver::{BatchSummary, FailureNotice, Notifier, SuccessNotice};

/// Records every notice it receives.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    successes: Arc<RwLock<Vec<SuccessNotice>>>,
    failures: Arc<RwLock<Vec<FailureNotice>>>,
    summaries: Arc<RwLock<Vec<BatchSummary>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn successes(&self) -> Vec<SuccessNotice> {
        self.successes.read().await.clone()
    }

    pub async fn failures(&self) -> Vec<FailureNotice> {
        self.failures.read().await.clone()
    }

    pub async fn summaries(&self) -> Vec<BatchSummary> {
        self.summaries.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn item_succeeded(&self, notice: &SuccessNotice) {
        self.successes.write().await.push(notice.clone());
    }

    async fn item_failed(&self, notice: &FailureNotice) {
        self.failures.write().await.push(notice.clone());
    }

    async fn batch_finished(&self, summary: &BatchSummary) {
        self.summaries.write().await.push(summary.clone());
    }
}
