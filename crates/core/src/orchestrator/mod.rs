//! Source orchestrator.
//!
//! For one item, launches one worker per configured source, retries
//! transient failures, waits for all workers up to a wall-clock budget and
//! returns the records that completed successfully. Items are never fanned
//! out concurrently with each other.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::SourceOrchestrator;
pub use types::{SourceResults, SourceStatus};
