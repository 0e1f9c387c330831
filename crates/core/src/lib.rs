pub mod config;
pub mod driver;
pub mod metrics;
pub mod namer;
pub mod orchestrator;
pub mod reconciler;
pub mod record;
pub mod source;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use driver::{
    BatchSummary, Downstream, DownstreamError, DriverConfig, FailureNotice, ItemError,
    LogDownstream, LogNotifier, Notifier, Pipeline, SuccessNotice,
};
pub use namer::{Namer, NamerConfig, NamingPlan, Platform, TemplateError};
pub use orchestrator::{OrchestratorConfig, SourceOrchestrator, SourceResults, SourceStatus};
pub use reconciler::{AggregationError, AliasTable, Reconciler, ReconcilerConfig, WatermarkedCover};
pub use record::{Field, FinalRecord, IdKind, Item, SourceRecord};
pub use source::{HttpSourceAdapter, HttpSourceConfig, SourceAdapter, SourceError, SourceRegistry};
