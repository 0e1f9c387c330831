//! Mock source adapter for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::record::SourceRecord;
use crate::source::{SourceAdapter, SourceError};

type ErrorFactory = Arc<dyn Fn() -> SourceError + Send + Sync>;

#[derive(Clone)]
enum Outcome {
    Succeed(SourceRecord),
    Fail(ErrorFactory),
}

/// Shared count of `extract` calls, readable after the adapter has been
/// moved into a registry.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicU32>);

impl CallCounter {
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    fn inc(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock implementation of the SourceAdapter trait.
///
/// Outcomes queued with [`fail_times`](Self::fail_times) are played first;
/// afterwards every call gets the fallback outcome, which is "not found"
/// until [`succeed_with`](Self::succeed_with) or
/// [`fail_with`](Self::fail_with) replaces it.
pub struct MockSourceAdapter {
    name: String,
    self_retrying: bool,
    delay: Option<Duration>,
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: CallCounter,
    seeds: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for MockSourceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSourceAdapter")
            .field("name", &self.name)
            .field("self_retrying", &self.self_retrying)
            .field("delay", &self.delay)
            .field("calls", &self.calls.get())
            .finish()
    }
}

impl MockSourceAdapter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            self_retrying: false,
            delay: None,
            script: Mutex::new(VecDeque::new()),
            fallback: Outcome::Fail(Arc::new(|| SourceError::NotFound("mock".to_string()))),
            calls: CallCounter::default(),
            seeds: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fill the record with `record` on every unscripted call.
    pub fn succeed_with(mut self, record: SourceRecord) -> Self {
        self.fallback = Outcome::Succeed(record);
        self
    }

    /// Fail every unscripted call with the error `make` builds.
    pub fn fail_with<F>(mut self, make: F) -> Self
    where
        F: Fn() -> SourceError + Send + Sync + 'static,
    {
        self.fallback = Outcome::Fail(Arc::new(make));
        self
    }

    /// Queue `times` failures ahead of the fallback outcome.
    pub fn fail_times<F>(self, times: usize, make: F) -> Self
    where
        F: Fn() -> SourceError + Send + Sync + 'static,
    {
        let make: ErrorFactory = Arc::new(make);
        if let Ok(mut script) = self.script.lock() {
            for _ in 0..times {
                script.push_back(Outcome::Fail(make.clone()));
            }
        }
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Declare that the adapter retries on its own.
    pub fn self_retrying(mut self) -> Self {
        self.self_retrying = true;
        self
    }

    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    /// Seeds received so far, in call order.
    pub fn seed_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.seeds.clone()
    }

    fn next_outcome(&self) -> Outcome {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl SourceAdapter for MockSourceAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn self_retrying(&self) -> bool {
        self.self_retrying
    }

    async fn extract(&self, seed: &str, record: &mut SourceRecord) -> Result<(), SourceError> {
        self.calls.inc();
        if let Ok(mut seeds) = self.seeds.lock() {
            seeds.push(seed.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_outcome() {
            Outcome::Succeed(data) => {
                record.fill_from(data);
                Ok(())
            }
            Outcome::Fail(make) => Err(make()),
        }
    }
}
