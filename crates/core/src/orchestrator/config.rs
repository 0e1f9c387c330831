//! Orchestrator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::record::IdKind;

/// Source lists and retry policy for the per-item fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Sources for standard identifiers, in priority order.
    #[serde(default)]
    pub standard: Vec<String>,

    /// Sources for content ids, in priority order.
    #[serde(default)]
    pub content_id: Vec<String>,

    /// Sources for the alternate numbering scheme, in priority order.
    #[serde(default)]
    pub alternate: Vec<String>,

    /// Attempts per source for transient network failures.
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// Timeout for a single adapter attempt (milliseconds).
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_ms: u64,
}

fn default_retry() -> u32 {
    3
}

fn default_attempt_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            standard: Vec::new(),
            content_id: Vec::new(),
            alternate: Vec::new(),
            retry: default_retry(),
            attempt_timeout_ms: default_attempt_timeout(),
        }
    }
}

impl OrchestratorConfig {
    /// Ordered source names configured for an identifier kind.
    pub fn sources_for(&self, kind: IdKind) -> &[String] {
        match kind {
            IdKind::Standard => &self.standard,
            IdKind::ContentId => &self.content_id,
            IdKind::Alternate => &self.alternate,
        }
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Wall-clock budget for joining all workers of one item.
    pub fn join_budget(&self) -> Duration {
        self.attempt_timeout() * self.retry.max(1)
    }

    /// Sets the source list for one identifier kind.
    pub fn with_sources(mut self, kind: IdKind, sources: &[&str]) -> Self {
        let list = sources.iter().map(|s| s.to_string()).collect();
        match kind {
            IdKind::Standard => self.standard = list,
            IdKind::ContentId => self.content_id = list,
            IdKind::Alternate => self.alternate = list,
        }
        self
    }

    /// Sets retry count and per-attempt timeout.
    pub fn with_retry(mut self, retry: u32, attempt_timeout_ms: u64) -> Self {
        self.retry = retry;
        self.attempt_timeout_ms = attempt_timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.retry, 3);
        assert_eq!(config.attempt_timeout_ms, 10_000);
        assert_eq!(config.join_budget(), Duration::from_secs(30));
        assert!(config.sources_for(IdKind::Standard).is_empty());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            standard = ["alpha", "beta"]
            content_id = ["gamma"]
            retry = 2
            attempt_timeout_ms = 500
        "#;
        let config: OrchestratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.sources_for(IdKind::Standard), ["alpha", "beta"]);
        assert_eq!(config.sources_for(IdKind::ContentId), ["gamma"]);
        assert!(config.sources_for(IdKind::Alternate).is_empty());
        assert_eq!(config.join_budget(), Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_retry_still_has_budget() {
        let config = OrchestratorConfig::default().with_retry(0, 200);
        assert_eq!(config.join_budget(), Duration::from_millis(200));
    }
}
