//! Per-item source fan-out.
//!
//! One task per configured source is spawned for an item. Each task owns
//! exactly one [`SourceRecord`] and hands it back through its join handle, so
//! a task abandoned at the join deadline can never touch a record that has
//! already been handed to the merge.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::metrics;
use crate::record::{IdKind, Item, SourceRecord};
use crate::source::{bare_name, SourceAdapter, SourceError, SourceRegistry};

use super::config::OrchestratorConfig;
use super::types::{PlannedWorker, SourceResults, SourceStatus};

/// What a worker hands back when it finishes.
struct WorkerReport {
    attempts: u32,
    result: Result<SourceRecord, SourceError>,
}

enum Slot {
    Unregistered,
    Running(JoinHandle<WorkerReport>),
}

type Joined = (PlannedWorker, SourceStatus, Option<SourceRecord>);

/// Launches source workers for one item and collects what succeeded.
#[derive(Debug, Clone)]
pub struct SourceOrchestrator {
    config: OrchestratorConfig,
    registry: SourceRegistry,
}

impl SourceOrchestrator {
    /// Create a new orchestrator.
    pub fn new(config: OrchestratorConfig, registry: SourceRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Query every configured source for `item` concurrently.
    ///
    /// Returns successful records keyed by bare source name, in priority
    /// order. A content-id item that also carries a standard identifier may
    /// be reclassified here; see [`Item::reclassify_as_standard`].
    pub async fn run_sources(&self, item: &mut Item) -> SourceResults {
        let dual = item.has_dual_identity();
        let planned = self.plan_workers(item);

        info!(
            item = %item.display_id(),
            kind = %item.kind,
            sources = planned.len(),
            "Starting source fan-out"
        );

        let slots: Vec<(PlannedWorker, Slot)> = planned
            .into_iter()
            .map(|worker| {
                let slot = match self.registry.get(&worker.name) {
                    Some(adapter) => Slot::Running(self.spawn_worker(adapter, &worker)),
                    None => {
                        warn!(source = %worker.name, "No adapter registered for configured source");
                        Slot::Unregistered
                    }
                };
                (worker, slot)
            })
            .collect();

        let deadline = Instant::now() + self.config.join_budget();
        let mut joined: Vec<Joined> =
            join_all(slots.into_iter().map(|(worker, slot)| join_slot(worker, slot, deadline)))
                .await;

        if dual {
            correct_kind(item, &mut joined);
        }

        let mut records = Vec::new();
        let mut statuses = Vec::with_capacity(joined.len());
        for (worker, status, record) in joined {
            if let Some(record) = record {
                records.push((worker.name.clone(), record));
            }
            statuses.push((worker.name, status));
        }

        info!(
            item = %item.display_id(),
            succeeded = records.len(),
            configured = statuses.len(),
            "Source fan-out finished"
        );

        SourceResults::new(records, statuses)
    }

    fn spawn_worker(
        &self,
        adapter: Arc<dyn SourceAdapter>,
        worker: &PlannedWorker,
    ) -> JoinHandle<WorkerReport> {
        // Never double-retry an adapter that retries on its own.
        let retry = if adapter.self_retrying() {
            1
        } else {
            self.config.retry.max(1)
        };
        let record = SourceRecord::seeded(worker.group, &worker.seed);

        tokio::spawn(run_worker(
            adapter,
            worker.name.clone(),
            worker.seed.clone(),
            record,
            retry,
            self.config.attempt_timeout(),
        ))
    }

    /// Ordered worker list for an item; a dual-identity content-id item
    /// also gets the standard source list appended. Each source runs once.
    fn plan_workers(&self, item: &Item) -> Vec<PlannedWorker> {
        let mut planned: Vec<PlannedWorker> = Vec::new();

        let Some(primary) = item.primary_id().filter(|id| !id.is_empty()) else {
            warn!(kind = %item.kind, "Item has no identifier for its kind, skipping sources");
            return planned;
        };

        let mut groups = vec![(item.kind, primary.to_string())];
        if item.has_dual_identity() {
            if let Some(standard) = item.secondary_id() {
                groups.push((IdKind::Standard, standard.to_string()));
            }
        }

        for (group, seed) in groups {
            for name in self.config.sources_for(group) {
                let name = bare_name(name);
                match planned.iter_mut().find(|w| w.name == name) {
                    // A source listed for both kinds keeps its slot but is
                    // queried with the standard identifier.
                    Some(existing) if group == IdKind::Standard => {
                        existing.group = group;
                        existing.seed = seed.clone();
                    }
                    Some(_) => {}
                    None => planned.push(PlannedWorker {
                        name: name.to_string(),
                        group,
                        seed: seed.clone(),
                    }),
                }
            }
        }

        planned
    }
}

async fn join_slot(worker: PlannedWorker, slot: Slot, deadline: Instant) -> Joined {
    let handle = match slot {
        Slot::Unregistered => return (worker, SourceStatus::Unregistered, None),
        Slot::Running(handle) => handle,
    };

    match tokio::time::timeout_at(deadline, handle).await {
        Ok(Ok(WorkerReport {
            result: Ok(record), ..
        })) => (worker, SourceStatus::Succeeded, Some(record)),
        Ok(Ok(WorkerReport {
            attempts,
            result: Err(e),
        })) => {
            let status = SourceStatus::Failed {
                kind: e.kind().to_string(),
                attempts,
            };
            (worker, status, None)
        }
        Ok(Err(e)) => {
            error!(source = %worker.name, error = %e, "Source worker crashed");
            (worker, SourceStatus::Crashed, None)
        }
        Err(_) => {
            // Dropping the handle detaches the task; it keeps its own record.
            warn!(source = %worker.name, "Source worker exceeded join budget, abandoning");
            metrics::SOURCE_ATTEMPTS
                .with_label_values(&[worker.name.as_str(), "abandoned"])
                .inc();
            (worker, SourceStatus::Abandoned, None)
        }
    }
}

async fn run_worker(
    adapter: Arc<dyn SourceAdapter>,
    name: String,
    seed: String,
    mut record: SourceRecord,
    retry: u32,
    attempt_timeout: Duration,
) -> WorkerReport {
    let mut attempts = 0;
    let mut last_error = SourceError::Unclassified("no attempt made".to_string());

    while attempts < retry {
        attempts += 1;
        let started = Instant::now();

        let outcome =
            match tokio::time::timeout(attempt_timeout, adapter.extract(&seed, &mut record)).await {
                Ok(result) => result,
                Err(_) => Err(SourceError::TransientNetwork(format!(
                    "attempt timed out after {:?}",
                    attempt_timeout
                ))),
            };

        metrics::SOURCE_DURATION
            .with_label_values(&[name.as_str()])
            .observe(started.elapsed().as_secs_f64());

        let err = match outcome {
            Ok(()) => {
                metrics::SOURCE_ATTEMPTS
                    .with_label_values(&[name.as_str(), "success"])
                    .inc();
                debug!(source = %name, %seed, url = ?record.url, "Extraction succeeded");
                return WorkerReport {
                    attempts,
                    result: Ok(record),
                };
            }
            Err(e) => e,
        };

        metrics::SOURCE_ATTEMPTS
            .with_label_values(&[name.as_str(), err.kind()])
            .inc();

        match &err {
            SourceError::NotFound(_) => debug!(source = %name, %seed, "Not found"),
            SourceError::DuplicateTarget(_) => {
                warn!(source = %name, %seed, error = %err, "Identifier matched several entries")
            }
            SourceError::AccessDenied(_) => {
                error!(source = %name, error = %err, "Source access denied")
            }
            SourceError::TransientNetwork(_) => debug!(
                source = %name,
                attempt = attempts,
                retry,
                error = %err,
                "Network error, retrying"
            ),
            SourceError::Unclassified(_) => {
                error!(source = %name, %seed, error = %err, "Unexpected source failure")
            }
        }

        let retryable = err.is_retryable();
        last_error = err;
        if !retryable {
            break;
        }
    }

    WorkerReport {
        attempts,
        result: Err(last_error),
    }
}

/// Settle the identifier kind of a dual-identity content-id item.
///
/// A non-empty title from any standard source means the standard
/// identifier is the real one; otherwise the content id stands.
fn correct_kind(item: &mut Item, joined: &mut [Joined]) {
    let standard_titled = joined.iter().any(|(worker, _, record)| {
        worker.group == IdKind::Standard && record.as_ref().is_some_and(|r| r.has_title())
    });

    let dropped = if standard_titled {
        debug!(item = %item.display_id(), "Reclassifying content-id item as standard");
        item.reclassify_as_standard();
        IdKind::ContentId
    } else {
        debug!(item = %item.display_id(), "Confirmed content-id classification");
        item.confirm_content_id();
        IdKind::Standard
    };

    for (worker, status, record) in joined.iter_mut() {
        if worker.group == dropped && record.take().is_some() {
            *status = SourceStatus::Superseded;
        }
    }
}
