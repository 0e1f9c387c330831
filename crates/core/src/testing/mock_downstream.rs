//! Mock downstream consumer for testing.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::driver::{Downstream, DownstreamError};
use crate::namer::NamingPlan;
use crate::record::{FinalRecord, Item};

/// A delivery captured by [`MockDownstream`].
#[derive(Debug, Clone)]
pub struct Delivery {
    pub id: String,
    pub record: FinalRecord,
    pub plan: NamingPlan,
}

/// Records deliveries; can be told to fail for specific items.
#[derive(Debug, Clone, Default)]
pub struct MockDownstream {
    deliveries: Arc<RwLock<Vec<Delivery>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MockDownstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail deliveries for the item with this display identifier.
    pub async fn fail_for(&self, id: &str) {
        self.failing.write().await.insert(id.to_string());
    }

    /// Identifiers of successfully delivered items, in order.
    pub async fn delivered(&self) -> Vec<String> {
        self.deliveries
            .read()
            .await
            .iter()
            .map(|d| d.id.clone())
            .collect()
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.read().await.clone()
    }
}

#[async_trait]
impl Downstream for MockDownstream {
    async fn deliver(
        &self,
        item: &Item,
        record: &FinalRecord,
        plan: &NamingPlan,
    ) -> Result<(), DownstreamError> {
        let id = item.display_id().to_string();
        if self.failing.read().await.contains(&id) {
            return Err(DownstreamError::Other(format!("mock failure for {}", id)));
        }
        self.deliveries.write().await.push(Delivery {
            id,
            record: record.clone(),
            plan: plan.clone(),
        });
        Ok(())
    }
}
