use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Batch driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Pause after each successful item, in milliseconds. Not applied after
    /// a failed item or the last item.
    #[serde(default)]
    pub sleep_after_item_ms: u64,
}

impl DriverConfig {
    pub fn sleep_after_item(&self) -> Duration {
        Duration::from_millis(self.sleep_after_item_ms)
    }

    pub fn with_sleep_after_item(mut self, ms: u64) -> Self {
        self.sleep_after_item_ms = ms;
        self
    }
}
