//! Tracing-backed collaborators for runs without external consumers.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::namer::NamingPlan;
use crate::record::{FinalRecord, Item};

use super::types::{
    BatchSummary, Downstream, DownstreamError, FailureNotice, Notifier, SuccessNotice,
};

/// Logs notices instead of sending them anywhere.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn item_succeeded(&self, notice: &SuccessNotice) {
        info!(
            id = %notice.id,
            title = %notice.title,
            save_dir = %notice.save_dir.display(),
            "Item organized"
        );
    }

    async fn item_failed(&self, notice: &FailureNotice) {
        warn!(id = %notice.id, message = %notice.message, "Item failed");
    }

    async fn batch_finished(&self, summary: &BatchSummary) {
        info!(
            run_id = %summary.run_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch finished"
        );
    }
}

/// Dry-run consumer: logs the plan and touches nothing.
#[derive(Debug, Clone, Default)]
pub struct LogDownstream;

#[async_trait]
impl Downstream for LogDownstream {
    async fn deliver(
        &self,
        item: &Item,
        record: &FinalRecord,
        plan: &NamingPlan,
    ) -> Result<(), DownstreamError> {
        info!(
            item = %item.display_id(),
            id = %record.display_id(),
            covers = record.covers.len(),
            save_dir = %plan.save_dir.display(),
            basename = %plan.basename,
            nfo = %plan.nfo_file.display(),
            "Planned output (dry run)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namer::{Namer, NamerConfig};
    use crate::testing::fixtures;

    #[test]
    fn test_log_downstream_accepts_any_plan() {
        let item = Item::standard("ABC-123");
        let record = FinalRecord {
            info: fixtures::complete_record("Title", "http://x/c.jpg"),
            ..Default::default()
        };
        let plan = Namer::new(NamerConfig::default())
            .unwrap()
            .with_base_dir("/lib")
            .plan(&item, &record);

        let delivered = tokio_test::block_on(LogDownstream.deliver(&item, &record, &plan));
        assert!(delivered.is_ok());
    }
}
