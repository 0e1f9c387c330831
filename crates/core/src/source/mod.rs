//! Source adapter contract.
//!
//! Each remote metadata provider is an opaque [`SourceAdapter`] that fills a
//! [`SourceRecord`] for a seed identifier or fails with a classified
//! [`SourceError`]. The orchestrator decides retry versus abort purely from
//! that classification.

mod http;
mod registry;

pub use http::{HttpSourceAdapter, HttpSourceConfig};
pub use registry::{bare_name, SourceRegistry};

use async_trait::async_trait;
use thiserror::Error;

use crate::record::SourceRecord;

/// Ways a source can fail to produce a record.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source has no entry for the identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// The identifier resolves to more than one entry.
    #[error("duplicate target: {0}")]
    DuplicateTarget(String),

    /// Credentials rejected or the client is blocked.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Connection, timeout or server-side failure worth retrying.
    #[error("transient network failure: {0}")]
    TransientNetwork(String),

    /// Anything else.
    #[error("unclassified failure: {0}")]
    Unclassified(String),
}

impl SourceError {
    /// Whether the worker should try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::DuplicateTarget(_) => "duplicate_target",
            Self::AccessDenied(_) => "access_denied",
            Self::TransientNetwork(_) => "transient_network",
            Self::Unclassified(_) => "unclassified",
        }
    }
}

/// A remote metadata provider.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Name used in configuration source lists.
    fn name(&self) -> &str;

    /// Whether the adapter already retries internally.
    ///
    /// Self-retrying adapters are invoked exactly once per item.
    fn self_retrying(&self) -> bool {
        false
    }

    /// Populate `record` for `seed`.
    ///
    /// The record arrives pre-seeded with the identifier; the adapter owns
    /// it exclusively for the duration of the call.
    async fn extract(&self, seed: &str, record: &mut SourceRecord) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(SourceError::TransientNetwork("reset".into()).is_retryable());
        assert!(!SourceError::NotFound("x".into()).is_retryable());
        assert!(!SourceError::DuplicateTarget("x".into()).is_retryable());
        assert!(!SourceError::AccessDenied("x".into()).is_retryable());
        assert!(!SourceError::Unclassified("x".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::AccessDenied("blocked by site".to_string());
        assert_eq!(err.to_string(), "access denied: blocked by site");
        assert_eq!(err.kind(), "access_denied");
    }
}
