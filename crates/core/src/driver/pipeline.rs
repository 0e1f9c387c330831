//! Sequential batch driver.

use std::time::Instant;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::metrics;
use crate::namer::Namer;
use crate::orchestrator::SourceOrchestrator;
use crate::reconciler::Reconciler;
use crate::record::Item;

use super::config::DriverConfig;
use super::types::{BatchSummary, Downstream, FailureNotice, ItemError, Notifier, SuccessNotice};

/// Runs items through orchestrator, reconciler and namer, one at a time.
#[derive(Debug, Clone)]
pub struct Pipeline {
    orchestrator: SourceOrchestrator,
    reconciler: Reconciler,
    namer: Namer,
    config: DriverConfig,
}

impl Pipeline {
    pub fn new(
        orchestrator: SourceOrchestrator,
        reconciler: Reconciler,
        namer: Namer,
        config: DriverConfig,
    ) -> Self {
        Self {
            orchestrator,
            reconciler,
            namer,
            config,
        }
    }

    /// Process one item end to end.
    ///
    /// On success the item carries its record and naming plan. A failed
    /// merge leaves both unset.
    pub async fn process_item(
        &self,
        item: &mut Item,
        downstream: &dyn Downstream,
    ) -> Result<(), ItemError> {
        let records = self.orchestrator.run_sources(item).await;
        let record = self.reconciler.merge(item, records)?;
        let plan = self.namer.plan(item, &record);

        let delivered = downstream.deliver(item, &record, &plan).await;
        item.record = Some(record);
        item.plan = Some(plan);
        delivered?;
        Ok(())
    }

    /// Process every item in order and report the tally.
    ///
    /// A failing item is reported and skipped; it never stops the batch.
    pub async fn run_batch(
        &self,
        items: &mut [Item],
        downstream: &dyn Downstream,
        notifier: &dyn Notifier,
    ) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = items.len();
        let pause = self.config.sleep_after_item();
        let mut succeeded = 0;
        let mut failed_ids = Vec::new();

        info!(%run_id, total, "Starting batch");

        for (idx, item) in items.iter_mut().enumerate() {
            info!(index = idx + 1, total, item = %item.display_id(), "Processing item");
            let started = Instant::now();

            let result = self.process_item(item, downstream).await;
            let label = match &result {
                Ok(()) => "success",
                Err(e) => e.label(),
            };
            metrics::ITEMS_PROCESSED.with_label_values(&[label]).inc();
            metrics::ITEM_DURATION
                .with_label_values(&[label])
                .observe(started.elapsed().as_secs_f64());

            let succeeded_item = result.is_ok();
            match result {
                Ok(()) => {
                    succeeded += 1;
                    let notice = success_notice(item);
                    info!(item = %notice.id, save_dir = %notice.save_dir.display(), "Item done");
                    notifier.item_succeeded(&notice).await;
                }
                Err(e) => {
                    let id = item.display_id().to_string();
                    error!(item = %id, error = %e, "Item failed");
                    notifier
                        .item_failed(&FailureNotice {
                            id: id.clone(),
                            message: e.to_string(),
                        })
                        .await;
                    failed_ids.push(id);
                }
            }

            // Only a successful item is followed by the pause.
            if succeeded_item && idx + 1 < total && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        let summary = BatchSummary {
            run_id,
            total,
            succeeded,
            failed: failed_ids.len(),
            failed_ids,
            started_at,
            finished_at: Utc::now(),
        };
        notifier.batch_finished(&summary).await;
        summary
    }
}

fn success_notice(item: &Item) -> SuccessNotice {
    let id = item
        .record
        .as_ref()
        .map(|r| r.display_id().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| item.display_id().to_string());
    let (title, save_dir, poster_file) = match &item.plan {
        Some(plan) => (
            plan.nfo_title.clone(),
            plan.save_dir.clone(),
            plan.poster_file.clone(),
        ),
        None => Default::default(),
    };
    SuccessNotice {
        id,
        title,
        save_dir,
        poster_file,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::namer::{NamerConfig, Platform};
    use crate::orchestrator::OrchestratorConfig;
    use crate::reconciler::{AliasTable, ReconcilerConfig};
    use crate::record::IdKind;
    use crate::source::{SourceError, SourceRegistry};
    use crate::testing::{fixtures, MockDownstream, MockNotifier, MockSourceAdapter};

    fn pipeline(adapter: MockSourceAdapter, sleep_ms: u64) -> Pipeline {
        let orchestrator = SourceOrchestrator::new(
            OrchestratorConfig::default()
                .with_sources(IdKind::Standard, &["a"])
                .with_retry(1, 500),
            SourceRegistry::new().with(Arc::new(adapter)),
        );
        let namer = Namer::new(NamerConfig::default().with_platform(Platform::Linux))
            .unwrap()
            .with_base_dir("/lib");
        Pipeline::new(
            orchestrator,
            Reconciler::new(ReconcilerConfig::default(), AliasTable::new()),
            namer,
            DriverConfig::default().with_sleep_after_item(sleep_ms),
        )
    }

    #[tokio::test]
    async fn test_process_item_attaches_record_and_plan() {
        let adapter =
            MockSourceAdapter::new("a").succeed_with(fixtures::complete_record("Foo", "http://x/1.jpg"));
        let pipeline = pipeline(adapter, 0);
        let downstream = MockDownstream::new();

        let mut item = Item::standard("ABC-123");
        pipeline.process_item(&mut item, &downstream).await.unwrap();

        assert_eq!(item.record.as_ref().unwrap().info.title.as_deref(), Some("Foo"));
        assert_eq!(item.plan.as_ref().unwrap().basename, "ABC-123");
        assert_eq!(downstream.delivered().await, vec!["ABC-123".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_field_leaves_item_unmerged() {
        let adapter = MockSourceAdapter::new("a").succeed_with(fixtures::record("No cover"));
        let pipeline = pipeline(adapter, 0);
        let downstream = MockDownstream::new();

        let mut item = Item::standard("ABC-123");
        let err = pipeline.process_item(&mut item, &downstream).await.unwrap_err();

        assert_eq!(err.label(), "missing_field");
        assert!(item.record.is_none());
        assert!(item.plan.is_none());
        assert!(downstream.delivered().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_continues_after_failures() {
        let adapter = MockSourceAdapter::new("a")
            .fail_times(1, || SourceError::NotFound("gone".into()))
            .succeed_with(fixtures::complete_record("Foo", "http://x/1.jpg"));
        let pipeline = pipeline(adapter, 0);
        let downstream = MockDownstream::new();
        downstream.fail_for("CCC-003").await;
        let notifier = MockNotifier::new();

        let mut items = vec![
            Item::standard("AAA-001"),
            Item::standard("BBB-002"),
            Item::standard("CCC-003"),
        ];
        let summary = pipeline.run_batch(&mut items, &downstream, &notifier).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.failed_ids, vec!["AAA-001", "CCC-003"]);

        let successes = notifier.successes().await;
        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].id, "BBB-002");
        assert_eq!(successes[0].title, "BBB-002 Foo");
        assert_eq!(notifier.failures().await.len(), 2);
        assert_eq!(notifier.summaries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_no_pause_after_last_item() {
        let adapter =
            MockSourceAdapter::new("a").succeed_with(fixtures::complete_record("Foo", "http://x/1.jpg"));
        let pipeline = pipeline(adapter, 300);
        let downstream = MockDownstream::new();
        let notifier = MockNotifier::new();

        let mut items = vec![Item::standard("AAA-001"), Item::standard("BBB-002")];
        let started = std::time::Instant::now();
        pipeline.run_batch(&mut items, &downstream, &notifier).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_no_pause_after_failed_item() {
        let adapter = MockSourceAdapter::new("a").fail_with(|| SourceError::NotFound("gone".into()));
        let pipeline = pipeline(adapter, 300);
        let downstream = MockDownstream::new();
        let notifier = MockNotifier::new();

        let mut items = vec![
            Item::standard("AAA-001"),
            Item::standard("BBB-002"),
            Item::standard("CCC-003"),
        ];
        let started = std::time::Instant::now();
        let summary = pipeline.run_batch(&mut items, &downstream, &notifier).await;

        assert_eq!(summary.failed, 3);
        assert!(started.elapsed() < Duration::from_millis(300));
    }
}
